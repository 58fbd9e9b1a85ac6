use crate::domain::{join_context, DomainError, RetrievedDocument};

const CONTEXT_SLOT: &str = "{context}";
const INPUT_SLOT: &str = "{input}";

pub const DEFAULT_QA_TEMPLATE: &str = "I have provided you various job alerts.
Answer the questions based on the provided jobs only.
Please provide the most accurate response based on the question.
<context>
{context}
</context>
Question:{input}
";

/// Instruction template with a `{context}` and an `{input}` slot.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, INPUT_SLOT] {
            if !template.contains(slot) {
                return Err(DomainError::config(format!(
                    "prompt template is missing the {slot} placeholder"
                )));
            }
        }
        Ok(Self { template })
    }

    pub fn render(&self, documents: &[RetrievedDocument], question: &str) -> String {
        self.fill(&join_context(documents), question)
    }

    // Single pass so that placeholder-looking text inside the documents or
    // the question is never substituted a second time.
    fn fill(&self, context: &str, question: &str) -> String {
        let mut out =
            String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(CONTEXT_SLOT) {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(INPUT_SLOT) {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_QA_TEMPLATE.to_string(),
        }
    }
}
