mod bot;
mod components;
mod config;
mod db;
mod logger;

trait ResultLog {
    type OkType;
    fn expect_log(self, msg: &str) -> Self::OkType;
}
impl<T, S: AsRef<str>> ResultLog for Result<T, S> {
    type OkType=T;
    fn expect_log(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) if msg.is_empty() => panic!("{}", e.as_ref()),
            Err(e) => panic!("{}: {}", msg, e.as_ref()),
        }
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "./config.json".to_string());
    let config = config::Config::read_file(&config_path).map_err(|e| e.to_string()).expect_log("Could not load the configuration file");
    let level = config.log_level().map_err(|e| e.to_string()).expect_log("");
    logger::init(level).map_err(|e| e.to_string()).expect_log("Could not set the logger");
    let mut bot = bot::Bot::new(&config).await.map_err(|e| e.to_string()).expect_log("");
    bot.start().await.map_err(|e| e.to_string()).expect_log("Client won't start");
}
