#[derive(Debug, Clone)]
pub struct Authorize;

#[derive(Debug, Clone)]
pub struct Sale;

#[derive(Debug, Clone)]
pub struct Capture;

#[derive(Debug, Clone)]
pub struct Void;

#[derive(Debug, Clone)]
pub struct Refund;

#[derive(Debug, Clone)]
pub struct CreateCustomer;

#[derive(Debug, Clone)]
pub struct UpdateCustomer;

#[derive(Debug, Clone)]
pub struct FindCustomer;

#[derive(Debug, Clone)]
pub struct CreateSource;

#[derive(Debug, Clone)]
pub struct UpdateSource;

#[derive(Debug, Clone)]
pub struct FindSource;

#[derive(Debug, Clone)]
pub struct RemoveSource;

#[derive(Debug, Clone)]
pub struct ListSources;

#[derive(Debug, Clone)]
pub struct RetrieveEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FlowName {
    Authorize,
    Sale,
    Capture,
    Void,
    Refund,
    CreateCustomer,
    UpdateCustomer,
    FindCustomer,
    CreateSource,
    UpdateSource,
    FindSource,
    RemoveSource,
    ListSources,
    RetrieveEvent,
    IncomingWebhook,
}
