//! Atlassian Document Format conversion. The create path turns markdown-ish
//! text into an ADF document (paragraphs and fenced code blocks); the view
//! path flattens an ADF document back into displayable text.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct AdfDoc {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<AdfNode>,
}

#[derive(Debug, Clone, Serialize)]
struct AdfNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attrs: Option<AdfCodeAttrs>,
    content: Vec<AdfText>,
}

#[derive(Debug, Clone, Serialize)]
struct AdfCodeAttrs {
    language: String,
}

#[derive(Debug, Clone, Serialize)]
struct AdfText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl AdfNode {
    fn paragraph(text: String) -> Self {
        Self {
            node_type: "paragraph",
            attrs: None,
            content: text_content(text),
        }
    }

    fn code_block(language: String, text: String) -> Self {
        Self {
            node_type: "codeBlock",
            attrs: (!language.is_empty()).then_some(AdfCodeAttrs { language }),
            content: text_content(text),
        }
    }
}

fn text_content(text: String) -> Vec<AdfText> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![AdfText {
            text_type: "text",
            text,
        }]
    }
}

struct CodeFence {
    language: String,
    lines: Vec<String>,
}

impl CodeFence {
    fn into_node(self) -> AdfNode {
        AdfNode::code_block(self.language, self.lines.join("\n"))
    }
}

/// Blank lines separate paragraphs; a line starting with ``` opens or closes
/// a code block, with an optional language tag on the opening fence. Line
/// breaks inside a paragraph collapse to spaces.
pub fn text_to_doc(text: &str) -> AdfDoc {
    let cleaned = text.replace('\r', "");
    let mut nodes: Vec<AdfNode> = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut fence: Option<CodeFence> = None;

    for line in cleaned.lines() {
        let fence_marker = line.trim_start().strip_prefix("```");
        if let Some(mut block) = fence.take() {
            match fence_marker {
                Some(_) => nodes.push(block.into_node()),
                None => {
                    block.lines.push(line.to_string());
                    fence = Some(block);
                }
            }
        } else if let Some(info) = fence_marker {
            flush_paragraph(&mut nodes, &mut paragraph);
            fence = Some(CodeFence {
                language: info.trim().to_string(),
                lines: Vec::new(),
            });
        } else if line.trim().is_empty() {
            flush_paragraph(&mut nodes, &mut paragraph);
        } else {
            paragraph.push(line.trim().to_string());
        }
    }

    // Unterminated fence: keep the collected lines as a code block.
    if let Some(block) = fence.take() {
        nodes.push(block.into_node());
    }
    flush_paragraph(&mut nodes, &mut paragraph);

    AdfDoc {
        doc_type: "doc",
        version: 1,
        content: nodes,
    }
}

fn flush_paragraph(nodes: &mut Vec<AdfNode>, paragraph: &mut Vec<String>) {
    if !paragraph.is_empty() {
        nodes.push(AdfNode::paragraph(paragraph.join(" ")));
        paragraph.clear();
    }
}

/// Flattens an ADF document (as raw JSON) into text, re-fencing code blocks.
/// A plain-string value is passed through untouched so older API shapes still
/// render.
pub fn doc_to_text(value: &Value) -> String {
    if let Some(text) = value.as_str() {
        return text.to_string();
    }
    let mut blocks = Vec::new();
    if let Some(nodes) = value.get("content").and_then(Value::as_array) {
        for node in nodes {
            let text = block_to_text(node);
            if !text.is_empty() {
                blocks.push(text);
            }
        }
    }
    blocks.join("\n\n")
}

fn block_to_text(node: &Value) -> String {
    match node.get("type").and_then(Value::as_str) {
        Some("codeBlock") => {
            let language = node
                .get("attrs")
                .and_then(|attrs| attrs.get("language"))
                .and_then(Value::as_str)
                .unwrap_or("");
            format!("```{language}\n{}\n```", inline_text(node))
        }
        Some("bulletList") | Some("orderedList") => node
            .get("content")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| format!("- {}", inline_text(item)))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default(),
        Some("heading") => format!("## {}", inline_text(node)),
        _ => inline_text(node),
    }
}

fn inline_text(node: &Value) -> String {
    match node.get("type").and_then(Value::as_str) {
        Some("text") => node
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        Some("hardBreak") => "\n".to_string(),
        _ => node
            .get("content")
            .and_then(Value::as_array)
            .map(|children| children.iter().map(inline_text).collect::<Vec<_>>().join(""))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn as_json(doc: &AdfDoc) -> Value {
        serde_json::to_value(doc).expect("doc serializes")
    }

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        let doc = as_json(&text_to_doc("first line\nstill first\n\nsecond"));
        assert_eq!(
            doc,
            json!({
                "type": "doc",
                "version": 1,
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "first line still first"}]},
                    {"type": "paragraph", "content": [{"type": "text", "text": "second"}]},
                ]
            })
        );
    }

    #[test]
    fn fenced_block_becomes_code_block() {
        let doc = as_json(&text_to_doc("before\n\n```rust\nlet x = 1;\n```\n\nafter"));
        assert_eq!(
            doc,
            json!({
                "type": "doc",
                "version": 1,
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "before"}]},
                    {
                        "type": "codeBlock",
                        "attrs": {"language": "rust"},
                        "content": [{"type": "text", "text": "let x = 1;"}]
                    },
                    {"type": "paragraph", "content": [{"type": "text", "text": "after"}]},
                ]
            })
        );
    }

    #[test]
    fn unterminated_fence_still_produces_a_block() {
        let doc = as_json(&text_to_doc("```\ndangling"));
        assert_eq!(doc["content"][0]["type"], "codeBlock");
        assert_eq!(doc["content"][0]["content"][0]["text"], "dangling");
    }

    #[test]
    fn round_trips_through_doc_to_text() {
        let doc = as_json(&text_to_doc("a paragraph\n\n```sh\nls -la\n```"));
        assert_eq!(doc_to_text(&doc), "a paragraph\n\n```sh\nls -la\n```");
    }

    #[test]
    fn renders_lists_headings_and_breaks() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Steps"}]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "one"}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "two"}]}
                    ]},
                ]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "a"},
                    {"type": "hardBreak"},
                    {"type": "text", "text": "b"},
                ]},
            ]
        });
        assert_eq!(doc_to_text(&doc), "## Steps\n\n- one\n- two\n\na\nb");
    }

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(doc_to_text(&json!("just text")), "just text");
    }

    #[test]
    fn whitespace_only_input_yields_empty_doc() {
        let doc = as_json(&text_to_doc("  \n\n  "));
        assert_eq!(doc["content"], json!([]));
    }
}
