//! Markup stream over plain XML text, backed by `roxmltree`.

use std::sync::Arc;

use roxmltree::{Document, Node};

use super::stream::{MarkupEvent, MarkupStream};
use crate::error::{InflaterError, Result};

#[derive(Debug, Clone)]
struct XmlAttribute {
    namespace: Option<String>,
    name: String,
    value: String,
}

#[derive(Debug, Clone)]
enum Token {
    Start {
        name: String,
        attributes: Vec<XmlAttribute>,
        line: u32,
    },
    End {
        name: String,
        line: u32,
    },
    Text {
        line: u32,
    },
}

/// Pull cursor over an XML document.
///
/// The document is tokenized up front; `next()` then walks the tokens with
/// pull-parser depth semantics. Comments and processing instructions never
/// surface as events.
#[derive(Debug)]
pub struct XmlMarkupStream {
    source: Arc<str>,
    tokens: Vec<Token>,
    /// Index of the current token; `None` before the first `next()`.
    cursor: Option<usize>,
    depth: usize,
    /// Depth to drop once the stream moves past an END event.
    pending_pop: bool,
    finished: bool,
    closed: bool,
}

impl XmlMarkupStream {
    /// Tokenize `text`; `source` names the document in position descriptors.
    pub fn parse(source: impl Into<Arc<str>>, text: &str) -> Result<Self> {
        let doc = Document::parse(text)?;
        let mut tokens = Vec::new();
        collect_tokens(&doc, doc.root_element(), &mut tokens);
        Ok(Self {
            source: source.into(),
            tokens,
            cursor: None,
            depth: 0,
            pending_pop: false,
            finished: false,
            closed: false,
        })
    }

    /// Whether [`MarkupStream::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Name used for this document in diagnostics.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    fn current(&self) -> Option<&Token> {
        if self.finished {
            return None;
        }
        self.cursor.and_then(|i| self.tokens.get(i))
    }

    fn current_attributes(&self) -> &[XmlAttribute] {
        match self.current() {
            Some(Token::Start { attributes, .. }) => attributes,
            _ => &[],
        }
    }
}

fn line_of(doc: &Document<'_>, pos: usize) -> u32 {
    doc.text_pos_at(pos).row
}

fn collect_tokens(doc: &Document<'_>, node: Node<'_, '_>, tokens: &mut Vec<Token>) {
    let name = node.tag_name().name().to_string();
    let attributes = node
        .attributes()
        .map(|attr| XmlAttribute {
            namespace: attr.namespace().map(str::to_string),
            name: attr.name().to_string(),
            value: attr.value().to_string(),
        })
        .collect();
    tokens.push(Token::Start {
        name: name.clone(),
        attributes,
        line: line_of(doc, node.range().start),
    });

    for child in node.children() {
        if child.is_element() {
            collect_tokens(doc, child, tokens);
        } else if child.is_text() {
            tokens.push(Token::Text {
                line: line_of(doc, child.range().start),
            });
        }
    }

    tokens.push(Token::End {
        name,
        line: line_of(doc, node.range().end),
    });
}

impl MarkupStream for XmlMarkupStream {
    fn next(&mut self) -> Result<MarkupEvent> {
        if self.closed {
            return Err(InflaterError::Markup {
                position: self.position_description(),
                message: "stream already closed".to_string(),
            });
        }
        if self.pending_pop {
            self.depth = self.depth.saturating_sub(1);
            self.pending_pop = false;
        }

        let next = self.cursor.map_or(0, |i| i + 1);
        self.cursor = Some(next);
        let event = match self.tokens.get(next) {
            Some(Token::Start { .. }) => {
                self.depth += 1;
                MarkupEvent::StartTag
            }
            Some(Token::End { .. }) => {
                self.pending_pop = true;
                MarkupEvent::EndTag
            }
            Some(Token::Text { .. }) => MarkupEvent::Text,
            None => {
                self.finished = true;
                MarkupEvent::EndDocument
            }
        };
        Ok(event)
    }

    fn name(&self) -> Option<&str> {
        match self.current()? {
            Token::Start { name, .. } | Token::End { name, .. } => Some(name),
            Token::Text { .. } => None,
        }
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn attribute_count(&self) -> usize {
        self.current_attributes().len()
    }

    fn attribute_name(&self, index: usize) -> Option<&str> {
        self.current_attributes().get(index).map(|a| a.name.as_str())
    }

    fn attribute_value_at(&self, index: usize) -> Option<&str> {
        self.current_attributes()
            .get(index)
            .map(|a| a.value.as_str())
    }

    fn attribute_value(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.current_attributes()
            .iter()
            .find(|a| {
                a.name == name
                    && namespace.map_or(true, |ns| a.namespace.as_deref() == Some(ns))
            })
            .map(|a| a.value.as_str())
    }

    fn position_description(&self) -> String {
        match self.current() {
            Some(Token::Start { line, .. } | Token::End { line, .. } | Token::Text { line }) => {
                format!("{} line #{}", self.source, line)
            }
            None if self.finished => format!("{} end of document", self.source),
            None => format!("{} start of document", self.source),
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.tokens = Vec::new();
    }
}
