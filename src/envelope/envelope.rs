//! Type-tagged serialized message payload.

/// A serialized message with identity and routing metadata.
///
/// Pairs naturally with `MessageRouter<Envelope>`: publishers encode a
/// typed value into an envelope, subscribers inspect `kind` and decode the
/// payload back into the concrete type they care about.
///
/// ## Example
///
/// ```
/// use message_router::Envelope;
///
/// let envelope = Envelope::encode("msg-1", "VolumeChanged", &0.8_f32).unwrap();
/// assert_eq!(envelope.kind, "VolumeChanged");
///
/// let level: f32 = envelope.decode().unwrap();
/// assert_eq!(level, 0.8);
/// ```
#[derive(Clone, Debug)]
pub struct Envelope {
    /// Unique identifier for this message
    pub id: String,
    /// Message kind (e.g., "VolumeChanged", "TrackEnded")
    pub kind: String,
    /// Serialized payload (binary or JSON)
    pub payload: Vec<u8>,
    /// Optional metadata (correlation IDs, source tags, etc.)
    pub metadata: Option<Vec<(String, String)>>,
}

impl Envelope {
    /// Create an envelope from an already serialized payload.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            payload,
            metadata: None,
        }
    }

    /// Create an envelope with a plain-text payload.
    pub fn text(id: impl Into<String>, kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(id, kind, payload.into().into_bytes())
    }

    /// Create an envelope with a bitcode-serialized payload.
    pub fn encode<T: serde::Serialize>(
        id: impl Into<String>,
        kind: impl Into<String>,
        payload: &T,
    ) -> Result<Self, bitcode::Error> {
        let bytes = bitcode::serialize(payload)?;
        Ok(Self::new(id, kind, bytes))
    }

    /// Decode the payload from bitcode binary format.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, bitcode::Error> {
        bitcode::deserialize(&self.payload)
    }

    /// Create an envelope with a JSON-serialized payload.
    pub fn encode_json<T: serde::Serialize>(
        id: impl Into<String>,
        kind: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(payload)?;
        Ok(Self::new(id, kind, bytes))
    }

    /// Decode the payload from JSON.
    pub fn decode_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    /// Add a metadata pair to the envelope.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
