use crate::error::SyntaxError;
use crate::node::{JsonNode, JsonObject};
use crate::number::JsonNumber;

// -----------------------------------------------------------------------------
// JsonWriter

/// A push-style token writer producing a JSON document.
///
/// The binding engine emits documents exclusively through this interface.
/// [`TreeWriter`] assembles an in-memory [`JsonNode`]; text-backed
/// implementations drive an escaping serializer.
///
/// # Deferred names
///
/// Inside an object, [`name`](Self::name) does not commit the member until a
/// value follows. When the writer's serialize-nulls policy is off, a
/// [`null_value`](Self::null_value) following a name drops the whole member;
/// inside an array a null is always written, since omission would shift the
/// remaining indices.
pub trait JsonWriter {
    fn begin_object(&mut self) -> Result<(), SyntaxError>;

    fn end_object(&mut self) -> Result<(), SyntaxError>;

    fn begin_array(&mut self) -> Result<(), SyntaxError>;

    fn end_array(&mut self) -> Result<(), SyntaxError>;

    /// Stages the name of the next object member.
    fn name(&mut self, name: &str) -> Result<(), SyntaxError>;

    fn string_value(&mut self, value: &str) -> Result<(), SyntaxError>;

    fn number_value(&mut self, value: JsonNumber) -> Result<(), SyntaxError>;

    fn bool_value(&mut self, value: bool) -> Result<(), SyntaxError>;

    /// Writes a null, or drops the staged member per the deferred-name policy.
    fn null_value(&mut self) -> Result<(), SyntaxError>;
}

// -----------------------------------------------------------------------------
// TreeWriter

/// A [`JsonWriter`] assembling an in-memory [`JsonNode`].
///
/// # Examples
///
/// ```
/// use ojson_tree::{JsonNode, JsonWriter, TreeWriter};
///
/// let mut writer = TreeWriter::new();
/// writer.begin_object().unwrap();
/// writer.name("ok").unwrap();
/// writer.bool_value(true).unwrap();
/// writer.name("gone").unwrap();
/// writer.null_value().unwrap(); // dropped: serialize-nulls defaults to off
/// writer.end_object().unwrap();
///
/// let node = writer.finish().unwrap();
/// let obj = node.as_object().unwrap();
/// assert_eq!(obj.len(), 1);
/// assert!(obj.get("gone").is_none());
/// ```
pub struct TreeWriter {
    serialize_nulls: bool,
    stack: Vec<Frame>,
    root: Option<JsonNode>,
}

enum Frame {
    Array(Vec<JsonNode>),
    Object {
        object: JsonObject,
        pending_name: Option<String>,
    },
}

impl Default for TreeWriter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TreeWriter {
    /// Creates a writer that omits null object members.
    #[inline]
    pub fn new() -> Self {
        Self {
            serialize_nulls: false,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Sets whether null object members are kept.
    #[inline]
    pub fn with_serialize_nulls(mut self, serialize_nulls: bool) -> Self {
        self.serialize_nulls = serialize_nulls;
        self
    }

    /// Returns the finished document.
    pub fn finish(self) -> Result<JsonNode, SyntaxError> {
        if !self.stack.is_empty() {
            return Err(SyntaxError::new("document has unclosed objects or arrays"));
        }
        self.root
            .ok_or_else(|| SyntaxError::new("no value was written"))
    }

    /// Places a finished value at the current position.
    fn put(&mut self, node: JsonNode) -> Result<(), SyntaxError> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(SyntaxError::new("a second top-level value was written"));
                }
                self.root = Some(node);
                Ok(())
            }
            Some(Frame::Array(items)) => {
                items.push(node);
                Ok(())
            }
            Some(Frame::Object {
                object,
                pending_name,
            }) => match pending_name.take() {
                Some(name) => {
                    object.insert(name, node);
                    Ok(())
                }
                None => Err(SyntaxError::new("value written without a member name")),
            },
        }
    }
}

impl JsonWriter for TreeWriter {
    fn begin_object(&mut self) -> Result<(), SyntaxError> {
        self.stack.push(Frame::Object {
            object: JsonObject::new(),
            pending_name: None,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), SyntaxError> {
        match self.stack.pop() {
            Some(Frame::Object {
                object,
                pending_name: None,
            }) => self.put(JsonNode::Object(object)),
            Some(Frame::Object { .. }) => {
                Err(SyntaxError::new("object closed with a dangling member name"))
            }
            _ => Err(SyntaxError::new("no object is open")),
        }
    }

    fn begin_array(&mut self) -> Result<(), SyntaxError> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), SyntaxError> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.put(JsonNode::Array(items)),
            _ => Err(SyntaxError::new("no array is open")),
        }
    }

    fn name(&mut self, name: &str) -> Result<(), SyntaxError> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_name, .. }) => match pending_name {
                Some(_) => Err(SyntaxError::new("two member names in a row")),
                None => {
                    *pending_name = Some(name.to_owned());
                    Ok(())
                }
            },
            _ => Err(SyntaxError::new("member name outside an object")),
        }
    }

    fn string_value(&mut self, value: &str) -> Result<(), SyntaxError> {
        self.put(JsonNode::String(value.to_owned()))
    }

    fn number_value(&mut self, value: JsonNumber) -> Result<(), SyntaxError> {
        self.put(JsonNode::Number(value))
    }

    fn bool_value(&mut self, value: bool) -> Result<(), SyntaxError> {
        self.put(JsonNode::Bool(value))
    }

    fn null_value(&mut self) -> Result<(), SyntaxError> {
        if !self.serialize_nulls {
            if let Some(Frame::Object {
                pending_name: pending_name @ Some(_),
                ..
            }) = self.stack.last_mut()
            {
                *pending_name = None;
                return Ok(());
            }
        }
        self.put(JsonNode::Null)
    }
}

// -----------------------------------------------------------------------------
// write_node

/// Writes an already-built [`JsonNode`] to `writer`.
///
/// Null members inside objects pass through [`JsonWriter::null_value`], so the
/// writer's serialize-nulls policy applies to tree fragments too.
pub fn write_node(node: &JsonNode, writer: &mut dyn JsonWriter) -> Result<(), SyntaxError> {
    match node {
        JsonNode::Null => writer.null_value(),
        JsonNode::Bool(value) => writer.bool_value(*value),
        JsonNode::Number(value) => writer.number_value(value.clone()),
        JsonNode::String(value) => writer.string_value(value),
        JsonNode::Array(items) => {
            writer.begin_array()?;
            for item in items {
                write_node(item, writer)?;
            }
            writer.end_array()
        }
        JsonNode::Object(object) => {
            writer.begin_object()?;
            for (key, value) in object.iter() {
                writer.name(key)?;
                write_node(value, writer)?;
            }
            writer.end_object()
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{JsonWriter, TreeWriter, write_node};
    use crate::node::{JsonNode, JsonObject};
    use crate::read::{TreeReader, read_node};

    #[test]
    fn serialize_nulls_keeps_members() {
        let mut writer = TreeWriter::new().with_serialize_nulls(true);
        writer.begin_object().unwrap();
        writer.name("gone").unwrap();
        writer.null_value().unwrap();
        writer.end_object().unwrap();

        let node = writer.finish().unwrap();
        assert_eq!(node.as_object().unwrap().get("gone"), Some(&JsonNode::Null));
    }

    #[test]
    fn array_nulls_are_always_written() {
        let mut writer = TreeWriter::new();
        writer.begin_array().unwrap();
        writer.null_value().unwrap();
        writer.bool_value(false).unwrap();
        writer.end_array().unwrap();

        let node = writer.finish().unwrap();
        assert_eq!(node.as_array().unwrap().len(), 2);
        assert!(node.as_array().unwrap()[0].is_null());
    }

    #[test]
    fn write_read_round_trip() {
        let mut obj = JsonObject::new();
        obj.insert("a", JsonNode::from(1_u8));
        obj.insert("b", JsonNode::Array(vec![JsonNode::from("x")]));
        let node = JsonNode::Object(obj);

        let mut writer = TreeWriter::new();
        write_node(&node, &mut writer).unwrap();
        let rebuilt = writer.finish().unwrap();
        assert_eq!(rebuilt, node);

        let mut reader = TreeReader::new(&rebuilt);
        assert_eq!(read_node(&mut reader).unwrap(), node);
    }
}
