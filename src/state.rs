use s3list_backend::s3::ClientFactory;

/// Shared application state, injected into handlers / 应用共享状态
///
/// The client factory is the only mutable piece; everything else about a
/// request is derived per call.
pub struct AppState {
    pub clients: ClientFactory,
}
