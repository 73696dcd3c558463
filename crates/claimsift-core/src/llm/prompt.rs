//! Instructions sent with every chunk.

pub const SYSTEM_PROMPT: &str = "\
You are an expert AI assistant tasked with identifying and extracting potential test cases \
from a document. Your primary goal is to act as a quality assurance specialist, carefully \
reading the provided text to find specific, verifiable statements that describe \
functionality, equations, parameters, or model scope.

A 'test case' is any material item that should be confirmed as correctly implemented. \
This includes:
- Descriptions of the model's scope or purpose.
- Key equations, formulas, or algorithms.
- Specific parameter settings, variables, or data requirements.
- Any defined functionality, constraints, or assumptions.
- References to specific models, methodologies, or historical data.

For each test case you identify, you must provide the following:
- **Test Case Description:** A clear, concise summary of the test case.
- **Reference Text:** The exact sentence or section from the original document that \
supports the test case.

Format your output as a list of dictionaries in JSON format, with each dictionary \
representing a single test case and using the keys \"Test Case Description\" and \
\"Reference Text\". If no test cases are found, return an empty list.";

/// Wraps a chunk in the extraction request.
pub fn user_prompt(chunk: &str) -> String {
    format!(
        "Please analyze the following document excerpt and extract all potential test cases \
based on the instructions in the system prompt.

Document Excerpt:
---
{chunk}
---

Test Cases (as a JSON array):"
    )
}
