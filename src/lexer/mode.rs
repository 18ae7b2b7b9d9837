//! Lexer mode machine (spec §4.1, §4.8.1).

/// Which state the character scanner is currently in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexMode {
    /// Ordinary Parsley source: expressions, statements, `@`-literals.
    Normal,
    /// Inside `<Name ...` attribute position, up to the closing `>`/`/>`.
    Tag,
    /// Between a tag's `>` and its matching `</Name>`, for tags other than
    /// `style`/`script`. Text runs are literal; `{expr}` switches back to
    /// `Normal` for the duration of the expression (spec doesn't name a
    /// distinct token kind for plain tag-child text, so this mode reuses the
    /// lexer's String token for each text run between markup/interpolation —
    /// see DESIGN.md).
    TagChildren(String),
    /// Inside `<style>`/`<script>` raw-text content. `@{expr}` is the only
    /// recognized interpolation marker; everything else is literal.
    RawText(String),
}
