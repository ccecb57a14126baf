use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// Lazy body match; the regex crate guarantees linear-time search.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w*)[ \t]*\r?\n(.*?)```").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Every fenced block in `span`, in source order.
pub fn extract_code_blocks(span: &str) -> Vec<CodeBlock> {
    FENCE_RE
        .captures_iter(span)
        .map(|caps| CodeBlock {
            language: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            code: caps[2].trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_blocks_in_order() {
        let span = "```javascript\nconst a = 1;\n```\ntext\n```typescript\nlet b: number = 2;\n```";
        let blocks = extract_code_blocks(span);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "javascript");
        assert_eq!(blocks[0].code, "const a = 1;");
        assert_eq!(blocks[1].language, "typescript");
    }

    #[test]
    fn untagged_fence() {
        let blocks = extract_code_blocks("```\n  code  \n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "");
        assert_eq!(blocks[0].code, "code");
    }

    #[test]
    fn multiline_body_preserved() {
        let blocks = extract_code_blocks("```js\nfunction f() {\n  return 1;\n}\n```");
        assert_eq!(blocks[0].code, "function f() {\n  return 1;\n}");
    }

    #[test]
    fn unterminated_fence_is_ignored() {
        assert!(extract_code_blocks("```js\nconst a = 1;\n").is_empty());
    }

    #[test]
    fn no_fences() {
        assert!(extract_code_blocks("plain `inline` text").is_empty());
    }
}
