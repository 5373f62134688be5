//! Question-answer pipeline: retrieve chunks, assemble a bounded
//! context, and generate a grounded answer.

use std::sync::Arc;

use vellum_index::context::assemble_context;
use vellum_index::retriever::Retriever;
use vellum_index::store::SearchResult;
use vellum_llm::LlmProvider;
use vellum_llm::provider::Message;

/// Returned when retrieval produced no usable context.
pub const NO_EVIDENCE_ANSWER: &str = "관련된 정보를 찾을 수 없어 답변을 생성할 수 없습니다.";

/// A generated answer together with the evidence behind it.
#[derive(Debug)]
pub struct Answer {
    pub text: String,
    /// The assembled context the model saw. Empty when no evidence
    /// was found.
    pub context: String,
    /// Retrieval hits in rank order.
    pub results: Vec<SearchResult>,
}

impl Answer {
    /// Whether the answer is grounded in retrieved evidence.
    #[must_use]
    pub fn has_evidence(&self) -> bool {
        !self.context.is_empty()
    }
}

/// Ties retrieval to answer generation.
pub struct RagPipeline<P: LlmProvider> {
    retriever: Retriever<P>,
    provider: Arc<P>,
}

impl<P: LlmProvider> RagPipeline<P> {
    #[must_use]
    pub fn new(retriever: Retriever<P>, provider: Arc<P>) -> Self {
        Self {
            retriever,
            provider,
        }
    }

    /// Answer `question` from the indexed documents.
    ///
    /// Never fails: no evidence yields the fixed no-evidence answer,
    /// and a generation fault yields an error notice in place of the
    /// answer text, with the retrieved context preserved either way.
    pub async fn ask(&self, question: &str) -> Answer {
        let results = self.retriever.retrieve(question).await;
        let context = assemble_context(&results, self.retriever.config().max_context_length);

        if context.is_empty() {
            tracing::info!(question, "no evidence retrieved");
            return Answer {
                text: NO_EVIDENCE_ANSWER.to_string(),
                context,
                results,
            };
        }

        let prompt = answer_prompt(question, &context);
        let text = match self.provider.chat(&[Message::user(prompt)]).await {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                tracing::warn!("answer generation failed: {e}");
                format!("답변 생성 중 오류가 발생했습니다: {e}")
            }
        };

        Answer {
            text,
            context,
            results,
        }
    }
}

/// Build the grounded-answer prompt. The answer quotes the source text
/// verbatim, then explains it in Korean, citing page numbers carried
/// in the context.
fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        r#"Please provide an answer to the question based on the following context.

Context:
{context}

Question: {question}

Please follow this format when answering:
1. First, quote the exact relevant text from the context in its original language (English)
2. Then provide a Korean translation/explanation of that content
3. Structure your answer like this:
   - Start with the exact quote from the document
   - Then add: "주어진 문서에서 [topic]에 대한 정보는 위와 같습니다."
   - Follow with a Korean explanation/translation
4. write page number in the context
Guidelines:
- Use only the information contained in the context
- Quote the exact text that answers the question
- Provide accurate Korean translation
- If no relevant information is found, respond with "제공된 문서에서 해당 정보를 찾을 수 없습니다"

Answer:"#
    )
}
