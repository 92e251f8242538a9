#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// Only non-negative decimal digits are accepted; there is no sign.
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 50000000
    /// ```
    Integer(i64),

    /// String literal enclosed in double quotes, escapes already decoded
    ///
    /// # Examples
    /// ```text
    /// "name"
    /// "%s population: %.0f"
    /// ```
    String(String),

    /// Boolean keywords
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// The `null` keyword
    Null,

    // Identifiers
    /// Function name
    ///
    /// An ASCII letter followed by ASCII letters or digits. Only meaningful
    /// directly after an opening parenthesis.
    ///
    /// # Examples
    /// ```text
    /// elem
    /// sprintf
    /// ```
    Identifier(String),

    // Delimiters
    /// Left parenthesis, opens a call or an implicit `elem`
    LParen,

    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "integer {}", n),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Null => write!(f, "null"),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
