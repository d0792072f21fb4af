//! Macro and environment tables for the default vocabulary
//!
//! Each entry pairs the argument signature used by the walker with the
//! template used by the converter. Tables are grouped the way the default
//! databases group them into categories.

use phf::phf_map;

/// Signature and text template of one macro or environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEntry {
    pub signature: &'static str,
    pub template: &'static str,
}

const fn entry(signature: &'static str, template: &'static str) -> TextEntry {
    TextEntry {
        signature,
        template,
    }
}

/// Document structure, references and spacing
pub static BASE_MACROS: phf::Map<&'static str, TextEntry> = phf_map! {
    "\\" => entry("*[", "\n"),
    "newline" => entry("", "\n"),
    "linebreak" => entry("[", "\n"),
    "par" => entry("", "\n\n"),
    "noindent" => entry("", ""),
    "centering" => entry("", ""),
    "newpage" => entry("", "\n\n"),
    "clearpage" => entry("", "\n\n"),
    "pagebreak" => entry("[", "\n\n"),
    "smallskip" => entry("", "\n"),
    "medskip" => entry("", "\n"),
    "bigskip" => entry("", "\n"),
    "hspace" => entry("*{", " "),
    "vspace" => entry("*{", "\n"),
    "hfill" => entry("", " "),
    "vfill" => entry("", "\n"),
    // Preamble
    "documentclass" => entry("[{", ""),
    "usepackage" => entry("[{", ""),
    "input" => entry("{", ""),
    "include" => entry("{", ""),
    // References
    "label" => entry("{", ""),
    "ref" => entry("{", "[{1}]"),
    "pageref" => entry("{", "[{1}]"),
    "eqref" => entry("{", "({1})"),
    "cite" => entry("[{", "[{2}]"),
    "footnote" => entry("[{", " [{2}]"),
    "url" => entry("{", "{1}"),
    "href" => entry("{{", "{2} <{1}>"),
};

pub static BASE_ENVIRONMENTS: phf::Map<&'static str, TextEntry> = phf_map! {
    "document" => entry("", "{body}"),
    "center" => entry("", "{body}"),
    "flushleft" => entry("", "{body}"),
    "flushright" => entry("", "{body}"),
    "quote" => entry("", "{body}"),
    "quotation" => entry("", "{body}"),
    "verse" => entry("", "{body}"),
    "minipage" => entry("[{", "{body}"),
    "figure" => entry("[", "{body}"),
    "table" => entry("[", "{body}"),
    "tabular" => entry("{", "{body}"),
    "abstract" => entry("", "\n\nAbstract\n\n{body}\n"),
};

/// Font switches and inline formatting
pub static FORMATTING_MACROS: phf::Map<&'static str, TextEntry> = phf_map! {
    "emph" => entry("{", "{1}"),
    "textbf" => entry("{", "{1}"),
    "textit" => entry("{", "{1}"),
    "textsl" => entry("{", "{1}"),
    "texttt" => entry("{", "{1}"),
    "textsc" => entry("{", "{1}"),
    "textsf" => entry("{", "{1}"),
    "textrm" => entry("{", "{1}"),
    "textup" => entry("{", "{1}"),
    "textmd" => entry("{", "{1}"),
    "textnormal" => entry("{", "{1}"),
    "underline" => entry("{", "{1}"),
    "mbox" => entry("{", "{1}"),
    "hbox" => entry("{", "{1}"),
    "text" => entry("{", "{1}"),
    // Declarations
    "em" => entry("", ""),
    "bf" => entry("", ""),
    "it" => entry("", ""),
    "rm" => entry("", ""),
    "tt" => entry("", ""),
    "sc" => entry("", ""),
    "sf" => entry("", ""),
    "bfseries" => entry("", ""),
    "itshape" => entry("", ""),
    "ttfamily" => entry("", ""),
    "scshape" => entry("", ""),
    "normalfont" => entry("", ""),
    "tiny" => entry("", ""),
    "small" => entry("", ""),
    "footnotesize" => entry("", ""),
    "normalsize" => entry("", ""),
    "large" => entry("", ""),
    "Large" => entry("", ""),
    "huge" => entry("", ""),
    "Huge" => entry("", ""),
};

pub static SECTIONING_MACROS: phf::Map<&'static str, TextEntry> = phf_map! {
    "part" => entry("*[{", "\n\nPART {3}\n"),
    "chapter" => entry("*[{", "\n\nCHAPTER {3}\n"),
    "section" => entry("*[{", "\n\n§ {3}\n"),
    "subsection" => entry("*[{", "\n\n§§ {3}\n"),
    "subsubsection" => entry("*[{", "\n\n§§§ {3}\n"),
    "paragraph" => entry("*[{", "\n\n{3}\n"),
    "subparagraph" => entry("*[{", "\n\n{3}\n"),
    "title" => entry("{", "\n\n{1}\n\n"),
    "author" => entry("{", "{1}\n"),
    "date" => entry("{", "{1}\n"),
    "maketitle" => entry("", ""),
    "caption" => entry("*[{", "\n{3}\n"),
};

/// List environments; `\item` is registered separately with a callback
pub static LIST_ENVIRONMENTS: phf::Map<&'static str, TextEntry> = phf_map! {
    "itemize" => entry("", "{body}\n"),
    "enumerate" => entry("", "{body}\n"),
    "description" => entry("", "{body}\n"),
};
