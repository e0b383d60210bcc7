use crate::location::LookupService;

pub struct AppState {
    pub lookup: LookupService,
}
