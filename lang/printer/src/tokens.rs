// Symbols

pub const COMMA: &str = ",";
pub const DOT: &str = ".";
pub const COLON: &str = ":";
pub const EQ: &str = "=";
pub const AT: &str = "@";
pub const DOLLAR: &str = "$";
pub const HASH: &str = "#";
pub const PIPE: &str = "|";
pub const STAR: &str = "*";
pub const UNDERSCORE: &str = "_";
pub const BACKSLASH: &str = "\\";
pub const FAT_ARROW: &str = "=>";
pub const DOUBLE_COLON: &str = "::";
pub const PLUS_PLUS: &str = "++";

// Keywords

pub const LET: &str = "let";
pub const LET_REC: &str = "let rec";
pub const IN: &str = "in";
pub const MATCH: &str = "match";
pub const FIX: &str = "fix";
pub const EXTERNAL: &str = "external";
