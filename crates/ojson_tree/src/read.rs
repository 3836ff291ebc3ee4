use crate::error::SyntaxError;
use crate::node::{JsonNode, JsonObject};
use crate::number::JsonNumber;

// -----------------------------------------------------------------------------
// Token

/// The kind of the next structural element a [`JsonReader`] will produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Name,
    String,
    Number,
    Bool,
    Null,
    /// The document is exhausted.
    End,
}

// -----------------------------------------------------------------------------
// JsonReader

/// A pull-style token reader over a JSON document.
///
/// The binding engine consumes documents exclusively through this interface;
/// it never scans text itself. [`TreeReader`] adapts an in-memory [`JsonNode`];
/// text-backed implementations adapt a lexical tokenizer.
///
/// Every method may fail with a [`SyntaxError`] when the document (or the call
/// sequence) does not match; readers are not required to support recovery
/// after an error.
pub trait JsonReader {
    /// Returns the kind of the next element without consuming it.
    fn peek(&mut self) -> Result<Token, SyntaxError>;

    /// Consumes the opening brace of an object.
    fn begin_object(&mut self) -> Result<(), SyntaxError>;

    /// Consumes the closing brace of the current object.
    fn end_object(&mut self) -> Result<(), SyntaxError>;

    /// Consumes the opening bracket of an array.
    fn begin_array(&mut self) -> Result<(), SyntaxError>;

    /// Consumes the closing bracket of the current array.
    fn end_array(&mut self) -> Result<(), SyntaxError>;

    /// Consumes the next member name of the current object.
    fn next_name(&mut self) -> Result<String, SyntaxError>;

    /// Consumes a string value.
    fn next_string(&mut self) -> Result<String, SyntaxError>;

    /// Consumes a number value.
    fn next_number(&mut self) -> Result<JsonNumber, SyntaxError>;

    /// Consumes a boolean value.
    fn next_bool(&mut self) -> Result<bool, SyntaxError>;

    /// Consumes a null value.
    fn next_null(&mut self) -> Result<(), SyntaxError>;

    /// Consumes and discards the next value, however deep.
    fn skip_value(&mut self) -> Result<(), SyntaxError>;
}

// -----------------------------------------------------------------------------
// TreeReader

/// A [`JsonReader`] over an already-built [`JsonNode`].
///
/// # Examples
///
/// ```
/// use ojson_tree::{JsonNode, JsonReader, Token, TreeReader};
///
/// let node = JsonNode::Array(vec![JsonNode::from(1_u8), JsonNode::Null]);
/// let mut reader = TreeReader::new(&node);
///
/// reader.begin_array().unwrap();
/// assert_eq!(reader.next_number().unwrap().as_u64(), Some(1));
/// assert_eq!(reader.peek().unwrap(), Token::Null);
/// reader.next_null().unwrap();
/// reader.end_array().unwrap();
/// assert_eq!(reader.peek().unwrap(), Token::End);
/// ```
pub struct TreeReader<'a> {
    stack: Vec<Frame<'a>>,
}

enum Frame<'a> {
    Value(&'a JsonNode),
    Array {
        items: &'a [JsonNode],
        index: usize,
    },
    Object {
        entries: &'a [(String, JsonNode)],
        index: usize,
        value_pending: bool,
    },
}

impl<'a> TreeReader<'a> {
    /// Creates a reader positioned before `root`.
    pub fn new(root: &'a JsonNode) -> Self {
        Self {
            stack: vec![Frame::Value(root)],
        }
    }

    fn token_of(node: &JsonNode) -> Token {
        match node {
            JsonNode::Null => Token::Null,
            JsonNode::Bool(_) => Token::Bool,
            JsonNode::Number(_) => Token::Number,
            JsonNode::String(_) => Token::String,
            JsonNode::Array(_) => Token::BeginArray,
            JsonNode::Object(_) => Token::BeginObject,
        }
    }

    /// Consumes the node at the current value position.
    fn advance_value(&mut self) -> Result<&'a JsonNode, SyntaxError> {
        if matches!(self.stack.last(), Some(Frame::Value(_))) {
            let Some(Frame::Value(node)) = self.stack.pop() else {
                unreachable!()
            };
            return Ok(node);
        }
        match self.stack.last_mut() {
            None => Err(SyntaxError::new("expected a value, found end of document")),
            Some(Frame::Value(_)) => unreachable!(),
            Some(Frame::Array { items, index }) => {
                let items: &'a [JsonNode] = *items;
                match items.get(*index) {
                    Some(node) => {
                        *index += 1;
                        Ok(node)
                    }
                    None => Err(SyntaxError::new("expected a value, found end of array")),
                }
            }
            Some(Frame::Object {
                entries,
                index,
                value_pending,
            }) => {
                if !*value_pending {
                    return Err(SyntaxError::new("expected a member name before a value"));
                }
                let entries: &'a [(String, JsonNode)] = *entries;
                *value_pending = false;
                let node = &entries[*index].1;
                *index += 1;
                Ok(node)
            }
        }
    }
}

impl JsonReader for TreeReader<'_> {
    fn peek(&mut self) -> Result<Token, SyntaxError> {
        let token = match self.stack.last() {
            None => Token::End,
            Some(Frame::Value(node)) => Self::token_of(node),
            Some(Frame::Array { items, index }) => match items.get(*index) {
                Some(node) => Self::token_of(node),
                None => Token::EndArray,
            },
            Some(Frame::Object {
                entries,
                index,
                value_pending,
            }) => {
                if *value_pending {
                    Self::token_of(&entries[*index].1)
                } else if *index < entries.len() {
                    Token::Name
                } else {
                    Token::EndObject
                }
            }
        };
        Ok(token)
    }

    fn begin_object(&mut self) -> Result<(), SyntaxError> {
        match self.advance_value()? {
            JsonNode::Object(object) => {
                self.stack.push(Frame::Object {
                    entries: object.entries(),
                    index: 0,
                    value_pending: false,
                });
                Ok(())
            }
            node => Err(mismatch("object", node)),
        }
    }

    fn end_object(&mut self) -> Result<(), SyntaxError> {
        match self.stack.last() {
            Some(Frame::Object {
                entries,
                index,
                value_pending: false,
            }) if *index == entries.len() => {
                self.stack.pop();
                Ok(())
            }
            _ => Err(SyntaxError::new("object is not at its end")),
        }
    }

    fn begin_array(&mut self) -> Result<(), SyntaxError> {
        match self.advance_value()? {
            JsonNode::Array(items) => {
                self.stack.push(Frame::Array { items, index: 0 });
                Ok(())
            }
            node => Err(mismatch("array", node)),
        }
    }

    fn end_array(&mut self) -> Result<(), SyntaxError> {
        match self.stack.last() {
            Some(Frame::Array { items, index }) if *index == items.len() => {
                self.stack.pop();
                Ok(())
            }
            _ => Err(SyntaxError::new("array is not at its end")),
        }
    }

    fn next_name(&mut self) -> Result<String, SyntaxError> {
        match self.stack.last_mut() {
            Some(Frame::Object {
                entries,
                index,
                value_pending: value_pending @ false,
            }) if *index < entries.len() => {
                *value_pending = true;
                Ok(entries[*index].0.clone())
            }
            _ => Err(SyntaxError::new("expected a member name")),
        }
    }

    fn next_string(&mut self) -> Result<String, SyntaxError> {
        match self.advance_value()? {
            JsonNode::String(value) => Ok(value.clone()),
            node => Err(mismatch("string", node)),
        }
    }

    fn next_number(&mut self) -> Result<JsonNumber, SyntaxError> {
        match self.advance_value()? {
            JsonNode::Number(value) => Ok(value.clone()),
            node => Err(mismatch("number", node)),
        }
    }

    fn next_bool(&mut self) -> Result<bool, SyntaxError> {
        match self.advance_value()? {
            JsonNode::Bool(value) => Ok(*value),
            node => Err(mismatch("boolean", node)),
        }
    }

    fn next_null(&mut self) -> Result<(), SyntaxError> {
        match self.advance_value()? {
            JsonNode::Null => Ok(()),
            node => Err(mismatch("null", node)),
        }
    }

    fn skip_value(&mut self) -> Result<(), SyntaxError> {
        self.advance_value().map(|_| ())
    }
}

fn mismatch(expected: &str, found: &JsonNode) -> SyntaxError {
    SyntaxError::new(format!("expected {expected}, found {}", found.kind_name()))
}

// -----------------------------------------------------------------------------
// read_node

/// Reads one complete value from `reader` into a [`JsonNode`].
///
/// This is the bridge used when a tree consumer sits on a streaming source,
/// e.g. a custom converter that wants a document fragment.
pub fn read_node(reader: &mut dyn JsonReader) -> Result<JsonNode, SyntaxError> {
    match reader.peek()? {
        Token::Null => {
            reader.next_null()?;
            Ok(JsonNode::Null)
        }
        Token::Bool => Ok(JsonNode::Bool(reader.next_bool()?)),
        Token::Number => Ok(JsonNode::Number(reader.next_number()?)),
        Token::String => Ok(JsonNode::String(reader.next_string()?)),
        Token::BeginArray => {
            reader.begin_array()?;
            let mut items = Vec::new();
            while reader.peek()? != Token::EndArray {
                items.push(read_node(reader)?);
            }
            reader.end_array()?;
            Ok(JsonNode::Array(items))
        }
        Token::BeginObject => {
            reader.begin_object()?;
            let mut object = JsonObject::new();
            while reader.peek()? != Token::EndObject {
                let name = reader.next_name()?;
                object.insert(name, read_node(reader)?);
            }
            reader.end_object()?;
            Ok(JsonNode::Object(object))
        }
        token => Err(SyntaxError::new(format!(
            "expected a value, found {token:?}"
        ))),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{JsonReader, Token, TreeReader, read_node};
    use crate::node::{JsonNode, JsonObject};

    fn sample() -> JsonNode {
        let mut inner = JsonObject::new();
        inner.insert("x", JsonNode::from(1_u8));
        let mut obj = JsonObject::new();
        obj.insert("name", JsonNode::from("a"));
        obj.insert("items", JsonNode::Array(vec![JsonNode::from(2_u8)]));
        obj.insert("inner", JsonNode::Object(inner));
        JsonNode::Object(obj)
    }

    #[test]
    fn walks_an_object_in_order() {
        let node = sample();
        let mut reader = TreeReader::new(&node);

        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "name");
        assert_eq!(reader.next_string().unwrap(), "a");
        assert_eq!(reader.next_name().unwrap(), "items");
        reader.skip_value().unwrap();
        assert_eq!(reader.next_name().unwrap(), "inner");
        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "x");
        assert_eq!(reader.next_number().unwrap().as_u64(), Some(1));
        reader.end_object().unwrap();
        reader.end_object().unwrap();
        assert_eq!(reader.peek().unwrap(), Token::End);
    }

    #[test]
    fn read_node_round_trips_the_tree() {
        let node = sample();
        let mut reader = TreeReader::new(&node);
        assert_eq!(read_node(&mut reader).unwrap(), node);
    }

    #[test]
    fn type_mismatch_is_a_syntax_error() {
        let node = JsonNode::from("text");
        let mut reader = TreeReader::new(&node);
        assert!(reader.next_bool().is_err());
    }
}
