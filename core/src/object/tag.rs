use super::parse_utils::{attribution_is_valid, parse_id};
use super::{Attribution, Id, Kind, Kvlm, ParseObjectError};

/// An annotated tag: a named, attributed pointer to another object.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    /// Build a new tag object. `message` is stored exactly as given; callers
    /// that take free-form user input should run it through
    /// [`cleanup_message`](super::cleanup_message) first.
    pub fn new(
        object: &Id,
        kind: Kind,
        name: &str,
        tagger: Option<&Attribution>,
        message: &[u8],
    ) -> Tag {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", object.to_string());
        kvlm.push("type", kind.as_str());
        kvlm.push("tag", name);
        if let Some(tagger) = tagger {
            kvlm.push("tagger", tagger.to_string());
        }
        kvlm.set_message(message);

        Tag { kvlm }
    }

    pub fn parse(body: &[u8]) -> Result<Tag, ParseObjectError> {
        Ok(Tag {
            kvlm: Kvlm::parse(body)?,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// Returns the ID of the tagged object.
    pub fn object(&self) -> Result<Id, ParseObjectError> {
        self.kvlm
            .get(b"object")
            .and_then(parse_id)
            .ok_or_else(|| invalid("missing or malformed object header"))
    }

    /// Returns the kind the tag claims its target has.
    pub fn target_kind(&self) -> Result<Kind, ParseObjectError> {
        match self.kvlm.get(b"type") {
            Some(kind) => Kind::from_bytes(kind),
            None => Err(invalid("missing type header")),
        }
    }

    /// Returns the tag's own name (the `tag` header), which need not match
    /// the ref it is stored under.
    pub fn name(&self) -> Option<&[u8]> {
        self.kvlm.get(b"tag")
    }

    pub fn tagger(&self) -> Option<Attribution> {
        self.kvlm.get(b"tagger").and_then(Attribution::parse)
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message().unwrap_or_default()
    }

    /// Checks for `object`, `type`, and `tag` headers in that order. A
    /// `tagger` header may follow (very old tags lack one) but must be
    /// well-formed when present.
    pub fn check(&self) -> Result<(), ParseObjectError> {
        let mut fields = self.kvlm.fields();

        match fields.next() {
            Some((key, value)) if key == b"object" => {
                if parse_id(value).is_none() {
                    return Err(invalid("bad object header"));
                }
            }
            _ => return Err(invalid("missing object header")),
        }

        match fields.next() {
            Some((key, value)) if key == b"type" => {
                if Kind::from_bytes(value).is_err() {
                    return Err(invalid("bad type header"));
                }
            }
            _ => return Err(invalid("missing type header")),
        }

        match fields.next() {
            Some((key, _)) if key == b"tag" => (),
            _ => return Err(invalid("missing tag header")),
        }

        match fields.next() {
            Some((key, value)) if key == b"tagger" && !attribution_is_valid(value) => {
                Err(invalid("bad tagger header"))
            }
            _ => Ok(()),
        }
    }
}

fn invalid<S: Into<String>>(reason: S) -> ParseObjectError {
    ParseObjectError::invalid(Kind::Tag, reason)
}
