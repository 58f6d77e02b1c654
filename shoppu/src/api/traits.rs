pub trait IntoApiModel {
    type ApiModel;

    fn into_api_model(self) -> Self::ApiModel;
}

/// Like [`IntoApiModel`], but the conversion needs some
/// additional (usually database-derived) context.
pub trait IntoApiModelWithContext<C> {
    type ApiModel;

    fn into_api_model_with(self, context: &C) -> Self::ApiModel;
}
