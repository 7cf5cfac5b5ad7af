use crate::error::{Error, Result};
use crate::tag::{CommentBlock, TagNode, TypeExpression};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Tag titles whose first word after the type is a name rather than description.
const NAMED_TITLES: [&str; 6] = ["param", "arg", "argument", "property", "prop", "typedef"];

/// Parser for JSDoc-style documentation comments.
///
/// The `CommentParser` extracts every `/** ... */` block from a source file and splits it
/// into a free-text description and an ordered list of [`TagNode`]s, one per `@tag` line.
/// Lines that do not start with `@` continue the description of the preceding tag.
///
/// # Example
///
/// ```no_run
/// use swagger_from_comments::comment_parser::CommentParser;
/// use std::path::Path;
///
/// let parsed = CommentParser::parse_file(Path::new("routes/pets.js")).unwrap();
/// println!("Parsed {} documented blocks", parsed.blocks.len());
/// ```
pub struct CommentParser;

/// The documented comment blocks of one source file, in source order.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Comment blocks carrying at least one tag
    pub blocks: Vec<CommentBlock>,
}

impl CommentParser {
    /// Reads and parses a single source file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - A comment block is never closed
    /// - A `{type}` has unbalanced braces
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)?;
        let blocks = Self::parse_source(path, &content)?;

        debug!(
            "Found {} documented blocks in {}",
            blocks.len(),
            path.display()
        );

        Ok(ParsedFile {
            path: path.to_path_buf(),
            blocks,
        })
    }

    /// Parses files in order, stopping at the first failure.
    pub fn parse_files(paths: &[PathBuf]) -> Result<Vec<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| {
                    warn!("Failed to parse {}: {}", path.display(), e);
                })
            })
            .collect()
    }

    /// Extracts the documented blocks from source text. `path` is only used in errors.
    pub fn parse_source(path: &Path, content: &str) -> Result<Vec<CommentBlock>> {
        let mut blocks = Vec::new();
        let mut cursor = 0;

        while let Some(offset) = content[cursor..].find("/**") {
            let start = cursor + offset;
            let line = line_of(content, start);

            let end = match content[start + 2..].find("*/") {
                Some(end) => start + 2 + end,
                None => {
                    return Err(Error::CommentParse {
                        file: path.to_path_buf(),
                        line,
                        message: "unterminated documentation comment".to_string(),
                    })
                }
            };
            cursor = end + 2;

            // `/**/` is an empty plain comment
            if end == start + 2 {
                continue;
            }

            let block = parse_block(&content[start + 3..end]).map_err(|(relative, message)| {
                Error::CommentParse {
                    file: path.to_path_buf(),
                    line: line + relative,
                    message,
                }
            })?;

            if !block.tags.is_empty() {
                blocks.push(block);
            }
        }

        Ok(blocks)
    }
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Parses the inside of one comment. Errors carry the line offset within the comment.
fn parse_block(body: &str) -> std::result::Result<CommentBlock, (usize, String)> {
    let mut description: Vec<&str> = Vec::new();
    let mut tags: Vec<TagNode> = Vec::new();

    for (index, raw) in body.lines().enumerate() {
        let line = raw.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();

        if let Some(tag_line) = line.strip_prefix('@') {
            tags.push(parse_tag_line(tag_line).map_err(|message| (index, message))?);
        } else if let Some(tag) = tags.last_mut() {
            if !line.is_empty() {
                if !tag.description.is_empty() {
                    tag.description.push('\n');
                }
                tag.description.push_str(line);
            }
        } else {
            description.push(line);
        }
    }

    Ok(CommentBlock {
        description: description.join("\n").trim().to_string(),
        tags,
    })
}

fn parse_tag_line(line: &str) -> std::result::Result<TagNode, String> {
    let (title, rest) = split_word(line);
    let mut node = TagNode::new(title);
    let mut rest = rest;

    if rest.starts_with('{') {
        let close = matching_brace(rest).ok_or_else(|| format!("unbalanced braces in @{} type", title))?;
        node.type_expr = Some(parse_type_expression(&rest[1..close]));
        rest = rest[close + 1..].trim_start();
    }

    if NAMED_TITLES.contains(&title) {
        let (name, remainder) = split_word(rest);
        node.name = optional_name(name).to_string();
        rest = remainder.strip_prefix('-').unwrap_or(remainder);
    }

    node.description = rest.trim().to_string();
    Ok(node)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

/// `[name]` and `[name=default]` mark optional names; only the bare name is kept.
fn optional_name(name: &str) -> &str {
    match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
        Some(inner) => inner.split('=').next().unwrap_or(inner),
        None => name,
    }
}

fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses the text between the braces of a `{type}`.
///
/// `Array<T>`, `Array.<T>` and `T[]` are arrays of `T`; a name made of identifier
/// characters and dots is a named type; anything else is unresolved.
pub fn parse_type_expression(s: &str) -> TypeExpression {
    let s = s.trim();

    let element = s
        .strip_prefix("Array.<")
        .or_else(|| s.strip_prefix("Array<"))
        .and_then(|inner| inner.strip_suffix('>'))
        .or_else(|| s.strip_suffix("[]"));
    if let Some(element) = element {
        let element = element.trim();
        return if is_type_name(element) {
            TypeExpression::ArrayOf(element.to_string())
        } else {
            TypeExpression::Unresolved
        };
    }

    if is_type_name(s) {
        TypeExpression::Named(s.to_string())
    } else {
        TypeExpression::Unresolved
    }
}

fn is_type_name(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('.')
        && s.chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    fn parse(content: &str) -> Vec<CommentBlock> {
        CommentParser::parse_source(Path::new("test.js"), content).unwrap()
    }

    #[test]
    fn test_parse_route_block() {
        let source = r#"
/**
 * Returns a single pet
 * by its identifier.
 * @route GET /pets/{id}
 * @group pets - Operations about pets
 * @param {number} id.path.required - Pet id
 * @returns {Pet.model} 200 - The pet
 * @returns {Error} default - Unexpected error
 */
router.get('/pets/:id', handler);
"#;
        let blocks = parse(source);
        assert_eq!(blocks.len(), 1);

        let block = &blocks[0];
        assert_eq!(block.description, "Returns a single pet\nby its identifier.");
        assert_eq!(
            block.tags,
            vec![
                TagNode::new("route").with_description("GET /pets/{id}"),
                TagNode::new("group").with_description("pets - Operations about pets"),
                TagNode::new("param")
                    .with_name("id.path.required")
                    .with_type(TypeExpression::Named("number".to_string()))
                    .with_description("Pet id"),
                TagNode::new("returns")
                    .with_type(TypeExpression::Named("Pet.model".to_string()))
                    .with_description("200 - The pet"),
                TagNode::new("returns")
                    .with_type(TypeExpression::Named("Error".to_string()))
                    .with_description("default - Unexpected error"),
            ]
        );
    }

    #[test]
    fn test_parse_typedef_block() {
        let source = r#"
/**
 * @typedef Pet
 * @property {string} name.required - Pet name
 * @property {Array.<Tag>} tags - Tags
 */
"#;
        let blocks = parse(source);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_typedef());
        assert_eq!(blocks[0].tags[0].name, "Pet");
        assert_eq!(blocks[0].tags[0].type_expr, None);
        assert_eq!(
            blocks[0].tags[2].type_expr,
            Some(TypeExpression::ArrayOf("Tag".to_string()))
        );
    }

    #[test]
    fn test_multiple_blocks_in_source_order() {
        let source = r#"
/** @route GET /a */
function a() {}
/** Plain documentation without tags. */
/* not a doc comment */
/**/
/** @route POST /b */
"#;
        let blocks = parse(source);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].tags[0].description, "GET /a");
        assert_eq!(blocks[1].tags[0].description, "POST /b");
    }

    #[test]
    fn test_continuation_lines_extend_tag_description() {
        let source = r#"
/**
 * @route GET /pets
 * @summary List pets
 *   sorted by name
 */
"#;
        let blocks = parse(source);
        assert_eq!(blocks[0].tags[1].description, "List pets\nsorted by name");
    }

    #[test]
    fn test_security_json_description() {
        let source = "/**\n * @route GET /me\n * @security [{\"JWT\": []}]\n */";
        let blocks = parse(source);
        assert_eq!(blocks[0].tags[1].description, "[{\"JWT\": []}]");
    }

    #[test]
    fn test_optional_name_brackets() {
        let source = "/** @param {number} [limit.query=10] - Page size */";
        let blocks = parse(source);
        assert_eq!(blocks[0].tags[0].name, "limit.query");
        assert_eq!(blocks[0].tags[0].description, "Page size");
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let source = "const x = 1;\n/**\n * @route GET /broken\n";
        let err = CommentParser::parse_source(Path::new("broken.js"), source).unwrap_err();
        match err {
            Error::CommentParse { file, line, message } => {
                assert_eq!(file, PathBuf::from("broken.js"));
                assert_eq!(line, 2);
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unbalanced_type_is_an_error() {
        let source = "\n/**\n * @route GET /x\n * @param {string id.query - broken\n */";
        let err = CommentParser::parse_source(Path::new("x.js"), source).unwrap_err();
        match err {
            Error::CommentParse { line, message, .. } => {
                assert_eq!(line, 4);
                assert!(message.contains("@param"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_type_expression() {
        assert_eq!(
            parse_type_expression("Pet"),
            TypeExpression::Named("Pet".to_string())
        );
        assert_eq!(
            parse_type_expression("Array<Pet>"),
            TypeExpression::ArrayOf("Pet".to_string())
        );
        assert_eq!(
            parse_type_expression("string[]"),
            TypeExpression::ArrayOf("string".to_string())
        );
        assert_eq!(parse_type_expression("?string"), TypeExpression::Unresolved);
        assert_eq!(parse_type_expression("string|number"), TypeExpression::Unresolved);
        assert_eq!(parse_type_expression(""), TypeExpression::Unresolved);
    }

    #[test]
    fn test_parse_file_and_files() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_temp_file(&temp_dir, "a.js", "/** @route GET /a */");
        let second = create_temp_file(&temp_dir, "b.js", "// nothing documented");

        let parsed = CommentParser::parse_files(&[first.clone(), second.clone()]).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].path, first);
        assert_eq!(parsed[0].blocks.len(), 1);
        assert!(parsed[1].blocks.is_empty());
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = CommentParser::parse_file(Path::new("/nonexistent/file.js"));
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
