use casimir::{CasimirDemo, DemoError};

fn main() -> Result<(), DemoError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    CasimirDemo::new().run()
}
