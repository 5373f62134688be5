//! Built-in requirement catalogs for reviewing valve procurement
//! documents.
//!
//! Each catalog is a fixed, ordered list of sections, and each section
//! an ordered list of requirement descriptors. The data is embedded at
//! compile time; nothing iterates an untyped mapping at runtime.

/// One named group of requirement descriptors.
#[derive(Clone, Copy, Debug)]
pub struct CatalogSection {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

/// An ordered requirement catalog.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    pub name: &'static str,
    pub sections: &'static [CatalogSection],
}

impl Catalog {
    /// Technical review items: valve construction, materials, and
    /// operating modes.
    #[must_use]
    pub const fn technical() -> Self {
        Self {
            name: "technical",
            sections: TECHNICAL_SECTIONS,
        }
    }

    /// Quality-assurance review items: certification scope, testing,
    /// and documentation requirements.
    #[must_use]
    pub const fn quality() -> Self {
        Self {
            name: "quality",
            sections: QA_SECTIONS,
        }
    }

    /// Look up a section by exact name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&'static CatalogSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Total requirement descriptors across all sections.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

const TECHNICAL_SECTIONS: &[CatalogSection] = &[
    CatalogSection {
        name: "BM LIST",
        items: &[
            "TYPE(VALVE BODY TYPE)",
            "CLASS(RATING), 압력급",
            "MATERIAL, BODY MATERIAL",
            "END CONNECTION(RF,FF, RTJ, SW, BW,NPT,WF)",
            "BONNET TYPE ; (SEAL) WELD BONNET, BOLTED BONNET, PRESSURE SEAL BONNET, NON BONNET(BONNETLESS)",
            "TRIM MATERIAL",
            "DISC TYPE",
            "LOCKING DEVICE(C.S.O, CSC)",
            "WATER SEAL  CONNECTION",
            "DESIGN PRESSURE, DESIGN TEMPRATURE",
            "OPERATING PRESSURE, OPERATING TEMPRATURE",
            "DIFFERENT PRESSURE(DELTA P)",
            "SIZE",
            "FORGING, CASTING",
        ],
    },
    CatalogSection {
        name: "PORT 규정",
        items: &[
            "BORE",
            "BORE DIAMETER",
            "PORT",
            "PORT DIAMETER",
            "STANDARD DIAMETER",
            "ASME B16.34 APPENDIX.A",
            "PIPE INSIDE DIAMETER",
            "PORT CONNECTION(RF,FF, RTJ, SW, BW,NPT,WF)",
        ],
    },
    CatalogSection {
        name: "BONNET",
        items: &[
            "WELD BONNET",
            "BOLTED BONNET",
            "PRESSURE SEAL BONNET",
            "NON BONNET(BONNETLESS)",
        ],
    },
    CatalogSection {
        name: "DISC(DISK) TYPE",
        items: &[
            "GATE V/V DISC TYPE - SOLID WEDGE",
            "GATE V/V DISC TYPE - FLEXIBLE WEDGE",
            "GATE V/V DISC TYPE - SPLIT WEDGE",
            "GATE V/V DISC TYPE - DOUBLE",
            "GATE V/V DISC TYPE - PARALLEL or PARALLEL SLIDE",
            "GLOBE V/V DISC TYPE - PLUG",
            "GLOBE V/V DISC TYPE - PARABOLIC",
            "GLOBE V/V DISC TYPE - CONE",
            "GLOBE V/V DISC TYPE - NEEDLE",
            "GLOBE V/V DISC TYPE - NEEDLE POINT",
            "GLOBE V/V DISC TYPE - LINNER",
            "GLOBE V/V DISC TYPE - EQ %",
            "GLOBE V/V DISC TYPE - QUICK OPEN",
            "GLOBE V/V DISC TYPE - Y -TYPE",
            "GLOBE V/V DISC TYPE - ANGLE",
            "GLOBE V/V DISC TYPE - CONTINUOUS BLOW DOWN",
            "GLOBE V/V DISC TYPE - INTERMIDIATE BLOW DOWN",
            "GLOBE V/V DISC TYPE - FLOW CHARACTERISTIC",
            "GLOBE V/V DISC TYPE - THROTTING SERVICE",
            "GLOBE V/V DISC TYPE - DIFFERENT PRESSURE",
            "CHECK V/V TYPE - SWING",
            "CHECK V/V TYPE - LIFT",
            "CHECK V/V TYPE - TILTING",
            "CHECK V/V TYPE - NRV(NON RETURN VALVE)",
            "CHECK V/V TYPE - NOZZLE",
            "CHECK V/V TYPE - WAFER",
            "CHECK V/V TYPE - STOP, Y-STOP",
            "CHECK V/V TYPE - SPRING LOAD",
            "CHECK V/V TYPE - PRESSUR DROP",
            "CHECK V/V TYPE - INNER SHAFT",
        ],
    },
    CatalogSection {
        name: "SEAT 구조",
        items: &["SEAT RING", "RENEABLE SEAT", "INTEGRAL SEAT"],
    },
    CatalogSection {
        name: "MATERIAL",
        items: &[
            "BODY MATERIAL - FORGING, CASTING, ASTM ,ASME, JIS, KS, DIN, EN",
            "TIRM MATERIAL( DISC, STEM SEAT) - STELLITE, HARDFACING, HARDENED",
            "BOLTING MATERIAL - HOT DIP GALVANIZING",
            "BACKSEAT MATERIAL - STELLITE, HARDFACING, HARDENED",
        ],
    },
    CatalogSection {
        name: "CONTRUCTION",
        items: &[
            "BY-PASS VALVE-THERMAL BINDING, MSS SP-61",
            "EQUALIZING VALVE, BALANCE VALVE-OVER PRESSURE PROTECTION",
            "DRAIN VALVE-SLUDGE, VENT",
            "DISC HOLE(VENT HOLE)-OVER PRESSURE PROTECTION",
            "SAFETY RELIEF DEVICE-OVER PRESSURE PROTECTION",
            "POSITION INDICATOR-OPEN, CLOSE",
            "STEM PROTECTOR-PHYSICAL DAMAGE",
            "STEM COVER-PHYSICAL DAMAGE",
            "LIVE LOADING SPRING-GRAND BOLT/NUT",
            "VACUUM-BELLOW SEAL,DOUBLE PACKING, LANTERN RING, LEAK OFF, V TYPE TEPLON PACKING, VOC PACKING",
            "LIMIT SWITCH-OPEN, CLOSE, INTERMIDIATE",
            "LOCKING DEVICE(C.S.O, CSC)-RUST PREVENTION, STAINLESS",
            "NON-RISING HANDWHEEL-NON ROTATING STEM",
        ],
    },
    CatalogSection {
        name: "OPERATING MODE",
        items: &[
            "GEAR OPERATED",
            "MOV-RATED TORQUE, REQUIRED TORQUE 150%, 안전율 150%, 동작시간(OP/CL TIME)",
            "POV(AOV)-공급 AIR 압력, 안전율 150%, 동작시간(OP/CL TIME)",
        ],
    },
    CatalogSection {
        name: "압력급",
        items: &["SPECIAL CLASS, INTEMIDIATE"],
    },
];

const QA_SECTIONS: &[CatalogSection] = &[
    CatalogSection {
        name: "고객 구매주문서",
        items: &["고객 구매주문서에서 요구하는 작업이 삼신의 인증서 범위 내에 있음"],
    },
    CatalogSection {
        name: "밸브 형상",
        items: &["밸브 형상(VALVE TYPE)"],
    },
    CatalogSection {
        name: "성능 요건",
        items: &["호칭관 경(Size)", "ANSI 압력 등급(ANSI pressure class)"],
    },
    CatalogSection {
        name: "다음 부품의 재료",
        items: &[
            "Body/Bonnet",
            "Disk",
            "Stem",
            "Bolting",
            "도료(Protective coating)",
            "Gland packing",
            "Gasket",
        ],
    },
    CatalogSection {
        name: "재료 요건",
        items: &["열처리(Heat treatment)", "충격시험(Impact test)"],
    },
    CatalogSection {
        name: "용접 재료",
        items: &["용접 재료(WELDING MATERIALS)"],
    },
    CatalogSection {
        name: "밸브 악세사리",
        items: &["밸브 악세사리(VALVE ACCESSORIES)"],
    },
    CatalogSection {
        name: "세척 요건",
        items: &["세척 요건(CLEANING)"],
    },
    CatalogSection {
        name: "시험 요건",
        items: &["수압 시험수 요건", "기능(Functional)"],
    },
    CatalogSection {
        name: "표시, 포장 및 출하",
        items: &["표시, 포장 및 출하(MARKING, PACKAGING, AND SHIPPING)"],
    },
    CatalogSection {
        name: "검사",
        items: &["검사(INSPECTION)"],
    },
    CatalogSection {
        name: "비파괴 검사요건",
        items: &["비파괴 검사요건(NDE REQUIREMENTS)"],
    },
    CatalogSection {
        name: "제출 문서",
        items: &["제출 문서(DOCUMENT TO BE PROVIDED)"],
    },
    CatalogSection {
        name: "품질보증기록",
        items: &["품질보증기록(QA RECORDS)"],
    },
    CatalogSection {
        name: "납기",
        items: &["납기(DELIVERY)"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_catalog_shape() {
        let catalog = Catalog::technical();
        assert_eq!(catalog.sections.len(), 9);
        assert_eq!(catalog.sections[0].name, "BM LIST");
        assert_eq!(catalog.sections[0].items.len(), 14);
    }

    #[test]
    fn quality_catalog_shape() {
        let catalog = Catalog::quality();
        assert_eq!(catalog.sections.len(), 15);
        assert_eq!(catalog.sections.last().unwrap().name, "납기");
    }

    #[test]
    fn section_lookup_by_name() {
        let catalog = Catalog::technical();
        let bonnet = catalog.section("BONNET").unwrap();
        assert_eq!(bonnet.items.len(), 4);
        assert!(catalog.section("NOT A SECTION").is_none());
    }

    #[test]
    fn item_count_sums_sections() {
        let catalog = Catalog::quality();
        assert_eq!(
            catalog.item_count(),
            catalog.sections.iter().map(|s| s.items.len()).sum::<usize>()
        );
        assert!(catalog.item_count() >= 15);
    }
}
