// Reads the header of a Go source file: leading build constraints, the
// package clause and the import declarations. Scanning stops at the first
// declaration that is not an import, so file bodies are never tokenized.

use std::iter::Peekable;
use std::str::Chars;

/// What a Go file declares before its first top-level declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub package: String,

    /// Import paths in declaration order, duplicates kept
    pub imports: Vec<String>,

    /// Expression of the `//go:build` line, if any
    pub go_build: Option<String>,

    /// Bodies of `// +build` lines
    pub plus_build: Vec<String>,
}

impl FileHeader {
    pub fn imports_c(&self) -> bool {
        self.imports.iter().any(|i| i == "C")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    LParen,
    RParen,
    Dot,
    Semi,
    Other(char),
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("'{}'", s),
            Token::Str(s) => format!("{:?}", s),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Semi => "';'".to_string(),
            Token::Other(c) => format!("'{}'", c),
            Token::Eof => "EOF".to_string(),
        }
    }
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<Token, String> {
        self.skip_trivia()?;

        let Some(c) = self.chars.next() else {
            return Ok(Token::Eof);
        };

        match c {
            '(' => Ok(Token::LParen),
            ')' => Ok(Token::RParen),
            '.' => Ok(Token::Dot),
            ';' => Ok(Token::Semi),
            '"' => self.interpreted_string().map(Token::Str),
            '`' => self.raw_string().map(Token::Str),
            c if is_ident_start(c) => {
                let mut ident = String::from(c);
                while let Some(&c) = self.chars.peek() {
                    if !is_ident_continue(c) {
                        break;
                    }
                    ident.push(c);
                    self.chars.next();
                }
                Ok(Token::Ident(ident))
            }
            c => Ok(Token::Other(c)),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), String> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => {
                            self.chars.next();
                            self.chars.next();
                            while let Some(&c) = self.chars.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.chars.next();
                            }
                        }
                        Some('*') => {
                            self.chars.next();
                            self.chars.next();
                            self.block_comment()?;
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn block_comment(&mut self) -> Result<(), String> {
        let mut prev = '\0';
        for c in self.chars.by_ref() {
            if prev == '*' && c == '/' {
                return Ok(());
            }
            prev = c;
        }
        Err("comment not terminated".to_string())
    }

    fn interpreted_string(&mut self) -> Result<String, String> {
        let mut value = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '"' => return Ok(value),
                '\n' => break,
                '\\' => match self.chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => break,
                },
                c => value.push(c),
            }
        }
        Err("string literal not terminated".to_string())
    }

    fn raw_string(&mut self) -> Result<String, String> {
        let mut value = String::new();
        for c in self.chars.by_ref() {
            if c == '`' {
                return Ok(value);
            }
            value.push(c);
        }
        Err("raw string literal not terminated".to_string())
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Parse the header of a Go source file
pub fn parse_header(src: &str) -> Result<FileHeader, String> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let (go_build, plus_build) = constraint_comments(src)?;

    let mut scanner = Scanner::new(src);
    let mut header = FileHeader {
        go_build,
        plus_build,
        ..FileHeader::default()
    };

    match scanner.next_token()? {
        Token::Ident(kw) if kw == "package" => {}
        other => return Err(format!("expected 'package', found {}", other.describe())),
    }

    match scanner.next_token()? {
        Token::Ident(name) => header.package = name,
        other => return Err(format!("expected package name, found {}", other.describe())),
    }

    loop {
        match scanner.next_token()? {
            Token::Semi => continue,
            Token::Ident(kw) if kw == "import" => match scanner.next_token()? {
                Token::LParen => loop {
                    match scanner.next_token()? {
                        Token::Semi => continue,
                        Token::RParen => break,
                        tok => header.imports.push(import_spec(&mut scanner, tok)?),
                    }
                },
                tok => header.imports.push(import_spec(&mut scanner, tok)?),
            },
            _ => break,
        }
    }

    Ok(header)
}

/// Build constraints of the comment block that opens a file.
///
/// A `//go:build` line counts anywhere in that block and may appear only
/// once. `// +build` lines count only above the last blank line of the
/// block, so a comment directly above `package` is documentation.
fn constraint_comments(src: &str) -> Result<(Option<String>, Vec<String>), String> {
    let mut go_build: Option<String> = None;
    let mut plus_build: Vec<(usize, String)> = Vec::new();
    // Lines before this index sit above the last blank line
    let mut end = 0;
    let mut ended = false;
    let mut in_block = false;

    'lines: for (idx, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() && !ended {
            end = idx + 1;
            continue;
        }
        if !line.starts_with("//") {
            ended = true;
        }

        if !in_block {
            if let Some(expr) = go_build_expr(line) {
                if go_build.is_some() {
                    return Err("multiple //go:build comments".to_string());
                }
                go_build = Some(expr.to_string());
            }
            if let Some(body) = plus_build_body(line) {
                plus_build.push((idx, body.to_string()));
            }
        }

        let mut rest = line;
        while !rest.is_empty() {
            if in_block {
                match rest.find("*/") {
                    Some(i) => {
                        in_block = false;
                        rest = rest[i + 2..].trim();
                        continue;
                    }
                    None => continue 'lines,
                }
            }
            if rest.starts_with("//") {
                continue 'lines;
            }
            if let Some(after) = rest.strip_prefix("/*") {
                in_block = true;
                rest = after.trim();
                continue;
            }
            break 'lines;
        }
    }

    let plus_build = plus_build
        .into_iter()
        .filter(|(idx, _)| *idx < end)
        .map(|(_, body)| body)
        .collect();
    Ok((go_build, plus_build))
}

fn go_build_expr(line: &str) -> Option<&str> {
    let expr = line.strip_prefix("//go:build")?;
    (expr.is_empty() || expr.starts_with(char::is_whitespace)).then(|| expr.trim())
}

fn plus_build_body(line: &str) -> Option<&str> {
    let body = line.strip_prefix("//")?.trim_start().strip_prefix("+build")?;
    (body.is_empty() || body.starts_with(char::is_whitespace)).then(|| body.trim())
}

/// `[name | "." | "_"] "path"`, starting from an already scanned token
fn import_spec(scanner: &mut Scanner<'_>, first: Token) -> Result<String, String> {
    let path_token = match first {
        Token::Ident(_) | Token::Dot => scanner.next_token()?,
        tok => tok,
    };

    match path_token {
        Token::Str(path) if !path.is_empty() => Ok(path),
        Token::Str(_) => Err("empty import path".to_string()),
        other => Err(format!("expected import path, found {}", other.describe())),
    }
}
