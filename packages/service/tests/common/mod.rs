use pedagogy_service::config::Config;
use pedagogy_service::state::AppState;

pub fn create_test_state() -> AppState {
    AppState::new(Config {
        accuracy_window: 5,
        ..Config::default()
    })
    .expect("default test config is valid")
}
