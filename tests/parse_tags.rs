use pretty_assertions::assert_eq;
use tagtree::{
    parse, DocumentNode, EchoNode, Element, ForLoopNode, Node, ParseError, TextNode,
};

#[test]
fn text_for_loop_and_body() {
    let doc = parse("abc{$FOR i 1 5 1$}body{$END$}").unwrap();
    let expected = DocumentNode {
        children: vec![
            Node::Text(TextNode { content: "abc".into() }),
            Node::ForLoop(ForLoopNode {
                variable: "i".into(),
                start: Element::ConstantInteger(1),
                end: Element::ConstantInteger(5),
                step: Some(Element::ConstantInteger(1)),
                children: vec![Node::Text(TextNode { content: "body".into() })],
            }),
        ],
    };
    assert_eq!(doc, expected);
}

#[test]
fn echo_with_functions_and_string() {
    let doc = parse(r#"{$= i @sin "0.00" @decfmt $}"#).unwrap();
    let expected = DocumentNode {
        children: vec![Node::Echo(EchoNode {
            elements: vec![
                Element::Variable("i".into()),
                Element::Function("sin".into()),
                Element::StringLiteral("0.00".into()),
                Element::Function("decfmt".into()),
            ],
        })],
    };
    assert_eq!(doc, expected);
}

#[test]
fn extra_end_tag_is_a_structural_error() {
    let err = parse("{$FOR i 1 5$}{$END$}{$END$}").unwrap_err();
    assert!(matches!(err, ParseError::Structural(_)));
}

#[test]
fn missing_end_tag_is_a_structural_error() {
    let err = parse("{$FOR i 1 5$}body").unwrap_err();
    assert!(matches!(err, ParseError::Structural(_)));
}

#[test]
fn unbalanced_nested_loops_fail() {
    assert!(parse("{$FOR i 1 2$}{$FOR j 3 4$}{$END$}").is_err());
}

#[test]
fn for_argument_count_is_enforced() {
    // fewer than 3 content tokens
    assert!(parse("{$FOR i 1$}{$END$}").is_err());
    // more than 4 content tokens
    assert!(parse("{$FOR i 1 5 1 2$}{$END$}").is_err());
}

#[test]
fn function_is_not_a_legal_step_expression() {
    let err = parse("{$FOR i 1 5 @step$}{$END$}").unwrap_err();
    assert!(matches!(err, ParseError::Structural(_)));
}

#[test]
fn text_escapes_decode_and_bare_backslash_fails() {
    let doc = parse(r"a\{b\\c").unwrap();
    assert_eq!(
        doc.children,
        vec![Node::Text(TextNode { content: r"a{b\c".into() })]
    );

    let err = parse(r"a\nb").unwrap_err();
    assert!(matches!(err, ParseError::Lexical(_)));
}

#[test]
fn escaped_brace_does_not_open_a_tag() {
    let doc = parse(r"\{$= i $}").unwrap();
    assert_eq!(
        doc.children,
        vec![Node::Text(TextNode { content: "{$= i $}".into() })]
    );
}

#[test]
fn whitespace_inside_tags_is_free_form() {
    let tight = parse("{$FOR i 1 5$}{$END$}").unwrap();
    let loose = parse("{$   FOR   i   1   5   $}{$   END   $}").unwrap();
    assert_eq!(tight, loose);
}

#[test]
fn document_with_all_node_kinds() {
    let input = "head{$ FOR day 1 31 $}day {$= day \"/\" month $}\n{$ END $}tail";
    let doc = parse(input).unwrap();
    assert_eq!(doc.children.len(), 3);
    let Node::ForLoop(for_loop) = &doc.children[1] else {
        panic!("expected a for-loop, got {:?}", doc.children[1]);
    };
    assert_eq!(for_loop.variable, "day");
    assert_eq!(for_loop.children.len(), 3);
}

#[test]
fn negative_and_double_bounds() {
    let doc = parse("{$FOR i -5 5 0.5$}{$END$}").unwrap();
    let expected = DocumentNode {
        children: vec![Node::ForLoop(ForLoopNode {
            variable: "i".into(),
            start: Element::ConstantInteger(-5),
            end: Element::ConstantInteger(5),
            step: Some(Element::ConstantDouble(0.5)),
            children: vec![],
        })],
    };
    assert_eq!(doc, expected);
}

#[test]
fn echo_with_expression_elements() {
    let doc = parse("{$= i i * @sin $}").unwrap();
    let expected = DocumentNode {
        children: vec![Node::Echo(EchoNode {
            elements: vec![
                Element::Variable("i".into()),
                Element::Variable("i".into()),
                Element::Operator('*'),
                Element::Function("sin".into()),
            ],
        })],
    };
    assert_eq!(doc, expected);
}

#[test]
fn tag_begin_with_no_name_fails() {
    assert!(parse("{$ $}").is_err());
    assert!(parse("{$").is_err());
}
