use crate::stream::PushStream;

/// A participant inside one session.
#[derive(Debug)]
pub struct User {
    id: String,
    stream: Option<PushStream>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stream: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stream_id(&self) -> Option<u64> {
        self.stream.as_ref().map(PushStream::id)
    }

    /// The attached stream, if the client is still reading it.
    pub fn live_stream(&self) -> Option<&PushStream> {
        self.stream.as_ref().filter(|s| s.is_open())
    }

    pub fn live_stream_mut(&mut self) -> Option<&mut PushStream> {
        self.stream.as_mut().filter(|s| s.is_open())
    }

    /// Attach `stream`, ending any previous one (heartbeat first). Returns true
    /// when a previous stream was displaced.
    pub fn attach(&mut self, stream: PushStream) -> bool {
        let displaced = self.stream.take().map(PushStream::end).is_some();
        self.stream = Some(stream);
        displaced
    }

    pub fn detach(&mut self) -> Option<PushStream> {
        self.stream.take()
    }
}
