/// One typed literal or reference appearing inside a tag body.
#[derive(Debug, Clone)]
pub enum Element {
    ConstantInteger(i64),
    ConstantDouble(f64),
    Variable(String),
    Function(String),
    Operator(char),
    StringLiteral(String),
}

/// Absolute tolerance used when comparing double constants.
pub const DOUBLE_TOLERANCE: f64 = 1e-12;

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::ConstantInteger(a), Element::ConstantInteger(b)) => a == b,
            (Element::ConstantDouble(a), Element::ConstantDouble(b)) => {
                (a - b).abs() <= DOUBLE_TOLERANCE
            }
            (Element::Variable(a), Element::Variable(b)) => a == b,
            (Element::Function(a), Element::Function(b)) => a == b,
            (Element::Operator(a), Element::Operator(b)) => a == b,
            (Element::StringLiteral(a), Element::StringLiteral(b)) => a == b,
            _ => false,
        }
    }
}

/// One node of the parsed tree. Trees are immutable once the parser returns
/// them; equality is structural (same variant, same fields, children pairwise
/// equal in order, text compared with surrounding whitespace trimmed).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Document(DocumentNode),
    Text(TextNode),
    ForLoop(ForLoopNode),
    Echo(EchoNode),
}

/// Root of every parsed tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentNode {
    pub children: Vec<Node>,
}

/// A run of literal text between tags, with escapes already decoded.
#[derive(Debug, Clone)]
pub struct TextNode {
    pub content: String,
}

impl PartialEq for TextNode {
    fn eq(&self, other: &Self) -> bool {
        self.content.trim() == other.content.trim()
    }
}

/// A `{$ FOR ... $}` ... `{$ END $}` scope. `children` are exactly the nodes
/// lexically between the opening tag and its matching END.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoopNode {
    pub variable: String,
    pub start: Element,
    pub end: Element,
    pub step: Option<Element>,
    pub children: Vec<Node>,
}

/// A `{$= ... $}` tag holding an ordered sequence of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoNode {
    pub elements: Vec<Element>,
}
