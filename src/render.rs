use crate::ast::{DocumentNode, EchoNode, Element, ForLoopNode, Node, TextNode};
use std::fmt;

/// One handler per node variant. Dispatch via [`Node::accept`] never
/// recurses; the document and for-loop handlers walk their own children.
pub trait NodeVisitor {
    fn visit_document(&mut self, node: &DocumentNode);
    fn visit_text(&mut self, node: &TextNode);
    fn visit_for_loop(&mut self, node: &ForLoopNode);
    fn visit_echo(&mut self, node: &EchoNode);
}

impl Node {
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Node::Document(node) => visitor.visit_document(node),
            Node::Text(node) => visitor.visit_text(node),
            Node::ForLoop(node) => visitor.visit_for_loop(node),
            Node::Echo(node) => visitor.visit_echo(node),
        }
    }
}

/// Visitor producing the canonical text form of a tree. Reparsing the output
/// yields a structurally equal tree; tag spacing is normalized, byte-for-byte
/// fidelity with the original input is not a goal.
#[derive(Debug, Default)]
pub struct Renderer {
    out: String,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl NodeVisitor for Renderer {
    fn visit_document(&mut self, node: &DocumentNode) {
        for child in &node.children {
            child.accept(self);
        }
    }

    fn visit_text(&mut self, node: &TextNode) {
        // Re-escape the characters the text lexer treats specially.
        for c in node.content.chars() {
            match c {
                '\\' => self.out.push_str(r"\\"),
                '{' => self.out.push_str(r"\{"),
                _ => self.out.push(c),
            }
        }
    }

    fn visit_for_loop(&mut self, node: &ForLoopNode) {
        self.out.push_str("{$ FOR ");
        self.out.push_str(&node.variable);
        self.out.push(' ');
        self.out.push_str(&node.start.to_string());
        self.out.push(' ');
        self.out.push_str(&node.end.to_string());
        if let Some(step) = &node.step {
            self.out.push(' ');
            self.out.push_str(&step.to_string());
        }
        self.out.push_str(" $}");
        for child in &node.children {
            child.accept(self);
        }
        self.out.push_str("{$ END $}");
    }

    fn visit_echo(&mut self, node: &EchoNode) {
        self.out.push_str("{$=");
        for element in &node.elements {
            self.out.push(' ');
            self.out.push_str(&element.to_string());
        }
        self.out.push_str(" $}");
    }
}

/// Render a document tree to its canonical text form.
pub fn render(document: &DocumentNode) -> String {
    let mut renderer = Renderer::new();
    renderer.visit_document(document);
    renderer.finish()
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::ConstantInteger(value) => write!(f, "{value}"),
            Element::ConstantDouble(value) => {
                // An integral double still has to read back as a double.
                if value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            Element::Variable(name) => f.write_str(name),
            Element::Function(name) => write!(f, "@{name}"),
            Element::Operator(symbol) => write!(f, "{symbol}"),
            Element::StringLiteral(value) => {
                f.write_str("\"")?;
                for c in value.chars() {
                    match c {
                        '\\' => f.write_str(r"\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str(r"\n")?,
                        '\r' => f.write_str(r"\r")?,
                        '\t' => f.write_str(r"\t")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}
