//! Specials tokens and argument-less symbol macros
//!
//! Both tables map straight to replacement text. Specials are matched
//! longest-first by the walker, so `---` wins over `--`.

use phf::phf_map;

/// Specials token to text
pub static SPECIALS: phf::Map<&'static str, &'static str> = phf_map! {
    "~" => "\u{a0}",
    "--" => "–",
    "---" => "—",
    "``" => "“",
    "''" => "”",
    "!`" => "¡",
    "?`" => "¿",
};

/// Macros without arguments, keyed by name without the backslash
pub static SYMBOL_MACROS: phf::Map<&'static str, &'static str> = phf_map! {
    // Escaped characters
    "%" => "%",
    "&" => "&",
    "#" => "#",
    "$" => "$",
    "_" => "_",
    "{" => "{",
    "}" => "}",
    // Spacing
    " " => " ",
    "," => " ",
    ";" => " ",
    "quad" => " ",
    "qquad" => "  ",
    "enspace" => " ",
    "thinspace" => " ",
    "/" => "",
    "-" => "",
    // Dashes and dots
    "textendash" => "–",
    "textemdash" => "—",
    "ldots" => "…",
    "dots" => "…",
    "textellipsis" => "…",
    // Quotes
    "textquoteleft" => "‘",
    "textquoteright" => "’",
    "textquotedblleft" => "“",
    "textquotedblright" => "”",
    "guillemotleft" => "«",
    "guillemotright" => "»",
    // Text symbols
    "S" => "§",
    "P" => "¶",
    "dag" => "†",
    "ddag" => "‡",
    "textdagger" => "†",
    "textdaggerdbl" => "‡",
    "textbullet" => "•",
    "textdegree" => "°",
    "copyright" => "©",
    "textcopyright" => "©",
    "textregistered" => "®",
    "texttrademark" => "™",
    "pounds" => "£",
    "euro" => "€",
    "textbackslash" => "\\",
    "textasciitilde" => "~",
    "textasciicircum" => "^",
    "textbar" => "|",
    "textless" => "<",
    "textgreater" => ">",
    // Letters
    "ss" => "ß",
    "ae" => "æ",
    "AE" => "Æ",
    "oe" => "œ",
    "OE" => "Œ",
    "aa" => "å",
    "AA" => "Å",
    "o" => "ø",
    "O" => "Ø",
    "l" => "ł",
    "L" => "Ł",
    "i" => "ı",
    // Logos
    "TeX" => "TeX",
    "LaTeX" => "LaTeX",
    "LaTeXe" => "LaTeX2e",
};
