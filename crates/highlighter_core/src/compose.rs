/// Joins instructions and page content with exactly one blank line between them.
///
/// Blank lines at the seam are dropped first, so an instructions file that ends
/// with a newline (or a line of spaces) does not widen the gap.
pub fn compose_with_instructions(instructions: &str, content: &str) -> String {
    let instructions = strip_trailing_blank_lines(instructions);
    let content = strip_leading_blank_lines(content);
    format!("{instructions}\n\n{content}")
}

fn strip_trailing_blank_lines(text: &str) -> &str {
    let mut text = text.trim_end_matches(['\n', '\r']);
    while let Some((head, last)) = text.rsplit_once('\n') {
        if !last.trim().is_empty() {
            return text;
        }
        text = head.trim_end_matches(['\n', '\r']);
    }
    if text.trim().is_empty() {
        ""
    } else {
        text
    }
}

fn strip_leading_blank_lines(text: &str) -> &str {
    let mut text = text.trim_start_matches(['\n', '\r']);
    while let Some((first, rest)) = text.split_once('\n') {
        if !first.trim().is_empty() {
            return text;
        }
        text = rest.trim_start_matches(['\n', '\r']);
    }
    if text.trim().is_empty() {
        ""
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_blank_line_separates_the_parts() {
        assert_eq!(compose_with_instructions("Do X.", "Body"), "Do X.\n\nBody");
        assert_eq!(
            compose_with_instructions("Do X.\r\n\n", "\nBody\n"),
            "Do X.\n\nBody\n"
        );
    }

    #[test]
    fn whitespace_only_lines_at_the_seam_are_dropped() {
        assert_eq!(compose_with_instructions("Do X.\n \n", "Body"), "Do X.\n\nBody");
        assert_eq!(
            compose_with_instructions("Do X.\n\t\r\n  ", " \n\n  Body"),
            "Do X.\n\n  Body"
        );
    }

    #[test]
    fn indentation_inside_the_parts_is_kept() {
        assert_eq!(
            compose_with_instructions("Rules:\n  - be brief  ", "  code\n"),
            "Rules:\n  - be brief  \n\n  code\n"
        );
    }

    #[test]
    fn empty_parts_still_keep_the_separator() {
        assert_eq!(compose_with_instructions("", "Body"), "\n\nBody");
        assert_eq!(compose_with_instructions("Do X.", ""), "Do X.\n\n");
        assert_eq!(compose_with_instructions(" \n", "\n "), "\n\n");
    }
}
