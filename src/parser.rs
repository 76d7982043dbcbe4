use crate::ast::{DocumentNode, EchoNode, Element, ForLoopNode, Node, TextNode};
use crate::error::ParseError;
use crate::lexer::{Lexer, LexerState, Token};
use tracing::trace;

/// Stack-driven parser over one input text.
///
/// The open-scope stack is the for-loop nesting structure: the document root
/// sits at the bottom, every `FOR` tag pushes a loop scope, and its matching
/// `END` pops the scope and attaches it to the scope below. Whichever scope
/// is on top receives new children. The stack must be back down to just the
/// document when input runs out.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    document: DocumentNode,
    open_loops: Vec<ForLoopNode>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            document: DocumentNode::default(),
            open_loops: Vec::new(),
        }
    }

    /// Consume the whole input and build the tree. Either a complete
    /// document comes back or the parse fails; no partial tree escapes.
    pub fn parse(mut self) -> Result<DocumentNode, ParseError> {
        loop {
            match self.lexer.next_token()? {
                Token::Text(content) => self.push_child(Node::Text(TextNode { content })),
                Token::TagBegin => self.parse_tag()?,
                Token::TagEnd => self.lexer.set_state(LexerState::Text),
                Token::Eof => break,
                other => {
                    return Err(ParseError::structural(format!(
                        "unexpected token outside a tag: {other:?}"
                    )))
                }
            }
        }
        if !self.open_loops.is_empty() {
            return Err(ParseError::structural(format!(
                "unterminated for-loop: {} FOR tag(s) still open at end of input",
                self.open_loops.len()
            )));
        }
        trace!(children = self.document.children.len(), "parse finished");
        Ok(self.document)
    }

    fn push_child(&mut self, child: Node) {
        match self.open_loops.last_mut() {
            Some(open) => open.children.push(child),
            None => self.document.children.push(child),
        }
    }

    fn parse_tag(&mut self) -> Result<(), ParseError> {
        self.lexer.set_state(LexerState::TagName);
        let name = match self.lexer.next_token()? {
            Token::TagName(name) => name,
            other => {
                return Err(ParseError::structural(format!(
                    "expected a tag name after {{$, got {other:?}"
                )))
            }
        };
        self.lexer.set_state(LexerState::TagContent);
        trace!(tag = %name, "tag opened");
        match name.as_str() {
            "FOR" => self.parse_for_tag(),
            "END" => self.parse_end_tag(),
            "=" => self.parse_echo_tag(),
            other => Err(ParseError::structural(format!("invalid tag name: {other}"))),
        }
    }

    /// `{$ FOR variable start end [step] $}` — three or four arguments, the
    /// first a variable, the rest variable/string/number expressions. The
    /// closing `$}` is consumed here on both the three- and four-argument
    /// paths, so the lexer is back in text mode exactly once past the tag.
    fn parse_for_tag(&mut self) -> Result<(), ParseError> {
        let variable = match self.lexer.next_token()? {
            Token::Variable(name) => name,
            other => {
                return Err(ParseError::structural(format!(
                    "FOR tag needs a loop variable, got {other:?}"
                )))
            }
        };
        let start = self.for_expression("start")?;
        let end = self.for_expression("end")?;
        let step = match self.lexer.next_token()? {
            Token::TagEnd => None,
            token => {
                let step = for_element(token, "step")?;
                match self.lexer.next_token()? {
                    Token::TagEnd => {}
                    other => {
                        return Err(ParseError::structural(format!(
                            "FOR tag takes at most 4 arguments, got extra {other:?}"
                        )))
                    }
                }
                Some(step)
            }
        };
        self.lexer.set_state(LexerState::Text);

        self.open_loops.push(ForLoopNode {
            variable,
            start,
            end,
            step,
            children: Vec::new(),
        });
        Ok(())
    }

    /// `{$ END $}` closes the innermost open for-loop. The tag's `$}` is
    /// left for the generic top-level TagEnd case.
    fn parse_end_tag(&mut self) -> Result<(), ParseError> {
        match self.open_loops.pop() {
            Some(for_loop) => {
                trace!(variable = %for_loop.variable, "for-loop closed");
                self.push_child(Node::ForLoop(for_loop));
                Ok(())
            }
            None => Err(ParseError::structural(
                "unmatched END tag: no for-loop is open",
            )),
        }
    }

    fn parse_echo_tag(&mut self) -> Result<(), ParseError> {
        let mut elements = Vec::new();
        loop {
            match self.lexer.next_token()? {
                Token::TagEnd => break,
                Token::Variable(name) => elements.push(Element::Variable(name)),
                Token::Function(name) => elements.push(Element::Function(name)),
                Token::StringLit(value) => elements.push(Element::StringLiteral(value)),
                Token::Operator(symbol) => elements.push(Element::Operator(symbol)),
                Token::Integer(value) => elements.push(Element::ConstantInteger(value)),
                Token::Double(value) => elements.push(Element::ConstantDouble(value)),
                Token::Eof => {
                    return Err(ParseError::structural(
                        "echo tag not closed before end of input",
                    ))
                }
                other => {
                    return Err(ParseError::structural(format!(
                        "invalid element in echo tag: {other:?}"
                    )))
                }
            }
        }
        self.lexer.set_state(LexerState::Text);
        self.push_child(Node::Echo(EchoNode { elements }));
        Ok(())
    }

    fn for_expression(&mut self, role: &str) -> Result<Element, ParseError> {
        let token = self.lexer.next_token()?;
        for_element(token, role)
    }
}

/// FOR bounds and step accept variables, strings and numbers only; functions
/// and operators are rejected.
fn for_element(token: Token, role: &str) -> Result<Element, ParseError> {
    match token {
        Token::Variable(name) => Ok(Element::Variable(name)),
        Token::StringLit(value) => Ok(Element::StringLiteral(value)),
        Token::Integer(value) => Ok(Element::ConstantInteger(value)),
        Token::Double(value) => Ok(Element::ConstantDouble(value)),
        other => Err(ParseError::structural(format!(
            "FOR {role} expression must be a variable, string or number, got {other:?}"
        ))),
    }
}
