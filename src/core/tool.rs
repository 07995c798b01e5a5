use crate::core::scanner::SENTINEL_PATH;
use serde_json::{json, Value};

pub const TOOL_NAME: &str = "presentDocument";

pub const RESULT_INSTRUCTIONS: &str =
    "Acknowledge that the document has been created and is displayed to the user.";

pub fn result_message(title: &str) -> String {
    format!("Created markdown document: {}", title)
}

/// Function-tool declaration handed to the host chat runtime.
pub fn tool_definition() -> Value {
    json!({
        "type": "function",
        "name": TOOL_NAME,
        "description": "Display a document in markdown format.",
        "parameters": {
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Title for the document"
                },
                "markdown": {
                    "type": "string",
                    "description": format!(
                        "The markdown content to display. Describe embedded images in the following format: \
                         ![Detailed image prompt]({0}). IMPORTANT: For embedded images, you MUST use the EXACT \
                         placeholder path '{0}'.",
                        SENTINEL_PATH
                    )
                }
            },
            "required": ["title", "markdown"]
        }
    })
}

/// Instructions for the document author (usually a language model).
pub fn system_prompt() -> String {
    format!(
        "Use the {name} tool to create structured documents with text and embedded images. \
         This tool is ideal for:\n\
         - Guides, tutorials, and how-to content\n\
         - Educational content (lessons, explanations, timelines, concept visualizations)\n\
         - Reports and presentations\n\
         - Articles and blog posts with illustrations\n\
         - Recipes, travel guides and product presentations\n\
         \n\
         Use this tool instead of generating standalone images when the user wants informational \
         content with visuals, so text and images form one document.\n\
         \n\
         Format embedded images as: ![Detailed image prompt]({sentinel})",
        name = TOOL_NAME,
        sentinel = SENTINEL_PATH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition_requires_title_and_markdown() {
        let definition = tool_definition();

        assert_eq!(definition["name"], TOOL_NAME);
        assert_eq!(definition["parameters"]["required"], json!(["title", "markdown"]));
        assert_eq!(
            definition["parameters"]["properties"]["title"]["type"],
            "string"
        );
        assert!(definition["parameters"]["properties"]["markdown"]["description"]
            .as_str()
            .unwrap()
            .contains(SENTINEL_PATH));
    }

    #[test]
    fn test_system_prompt_mentions_placeholder_format() {
        let prompt = system_prompt();
        assert!(prompt.contains(TOOL_NAME));
        assert!(prompt.contains("![Detailed image prompt](__too_be_replaced_image_path__)"));
    }
}
