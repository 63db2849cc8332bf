//! Minimal `named.conf` reader used to find the zone files a service config
//! points at. It understands the statement structure (strings, braces,
//! semicolons, the three comment styles) and nothing of the option grammar;
//! syntax errors are `named-checkconf`'s business.

use std::sync::Arc;

/// One `zone` statement found in a service config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneStatement {
    /// Enclosing view, `None` for a top-level zone.
    pub view: Option<Arc<str>>,
    pub zone: Arc<str>,
    /// Raw `type` value; may be anything, including invalid.
    pub zone_type: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Open,
    Close,
    Semi,
}

impl Token {
    fn text(&self) -> Option<&str> {
        match self {
            Token::Word(s) | Token::Quoted(s) => Some(s),
            _ => None,
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            ';' => tokens.push(Token::Semi),
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '"' => {
                let mut text = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                text.push(escaped);
                            }
                        }
                        '"' => break,
                        _ => text.push(c),
                    }
                }
                tokens.push(Token::Quoted(text));
            }
            _ => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '{' | '}' | ';' | '"' | '#') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    tokens
}

#[derive(Debug)]
enum Frame {
    View(Arc<str>),
    Zone(ZoneStatement),
    Other,
}

/// Every zone statement in `input`, in document order.
pub fn parse_zone_statements(input: &str) -> Vec<ZoneStatement> {
    let tokens = tokenize(input);
    let mut stack: Vec<Frame> = Vec::new();
    let mut statement: Vec<&Token> = Vec::new();
    let mut zones = Vec::new();

    for token in &tokens {
        match token {
            Token::Open => {
                let keyword = statement.first().and_then(|t| t.text());
                let name = statement.get(1).and_then(|t| t.text());
                let in_zone = matches!(stack.last(), Some(Frame::Zone(_)));

                let frame = match (keyword, name) {
                    (Some("view"), Some(name)) if stack.is_empty() => {
                        Frame::View(Arc::from(name))
                    }
                    (Some("zone"), Some(name)) if !in_zone => Frame::Zone(ZoneStatement {
                        view: current_view(&stack),
                        zone: Arc::from(name),
                        zone_type: None,
                        file: None,
                    }),
                    _ => Frame::Other,
                };
                stack.push(frame);
                statement.clear();
            }
            Token::Close => {
                if let Some(Frame::Zone(zone)) = stack.pop() {
                    zones.push(zone);
                }
                statement.clear();
            }
            Token::Semi => {
                if let Some(Frame::Zone(zone)) = stack.last_mut() {
                    let key = statement.first().and_then(|t| t.text());
                    let value = statement.get(1).and_then(|t| t.text());
                    match (key, value) {
                        (Some("type"), Some(value)) => zone.zone_type = Some(value.to_string()),
                        (Some("file"), Some(value)) => zone.file = Some(value.to_string()),
                        _ => {}
                    }
                }
                statement.clear();
            }
            _ => statement.push(token),
        }
    }

    zones
}

fn current_view(stack: &[Frame]) -> Option<Arc<str>> {
    stack.iter().rev().find_map(|frame| match frame {
        Frame::View(name) => Some(Arc::clone(name)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = r#"#This named.conf file is autogenerated. DO NOT EDIT
options {
	directory "/var/domain";
	recursion no; // trailing
};
/* block
   comment with zone "fake" { }; */
acl public {
	192.168.1.4/30;
};
view "test_view" {
	match-clients { public; };
	zone "sub.university.edu" {
		type master;
		file "/etc/bind/named/test_view/sub.university.edu.db";
		allow-update { none; };
	};
	zone "university.edu" IN {
		type bad_type;
		file "/etc/bind/named/test_view/university.edu.db";
	};
};
zone "." {
	type hint;
	file "root.hint";
};
"#;

    #[test]
    fn test_zone_statements_in_document_order() {
        let zones = parse_zone_statements(CONF);

        assert_eq!(zones.len(), 3);
        assert_eq!(
            zones[0],
            ZoneStatement {
                view: Some(Arc::from("test_view")),
                zone: Arc::from("sub.university.edu"),
                zone_type: Some("master".to_string()),
                file: Some("/etc/bind/named/test_view/sub.university.edu.db".to_string()),
            }
        );
        assert_eq!(zones[1].zone.as_ref(), "university.edu");
        assert_eq!(zones[1].zone_type.as_deref(), Some("bad_type"));
        assert_eq!(zones[2].view, None);
        assert_eq!(zones[2].file.as_deref(), Some("root.hint"));
    }

    #[test]
    fn test_comments_are_ignored() {
        let zones = parse_zone_statements(CONF);
        assert!(zones.iter().all(|z| z.zone.as_ref() != "fake"));
    }

    #[test]
    fn test_unterminated_input_does_not_panic() {
        let zones = parse_zone_statements("view \"v\" { zone \"z\" { type master; file \"x");
        assert!(zones.is_empty());
    }
}
