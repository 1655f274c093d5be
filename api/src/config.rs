use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "api")]
#[command(about = "Job application tracker API", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Replace the demo account's jobs with the ones in a JSON file
    Populate {
        /// JSON array of jobs
        #[arg(long, default_value = "MOCK_DATA.json")]
        file: std::path::PathBuf,
        /// Email of the demo account
        #[arg(long, env = "DEMO_EMAIL", default_value = "demo@gmail.com")]
        email: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://jobs.db?mode=rwc")]
    pub database_url: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5200")]
    pub bind_addr: String,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Session lifetime
    #[arg(long, env = "JWT_EXPIRES_HOURS", default_value_t = 24)]
    pub jwt_expires_hours: i64,

    /// Mark the session cookie `Secure` (production)
    #[arg(long, env = "COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,

    /// Allowed CORS origin, credentials included
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    pub frontend_url: String,
}

impl Config {
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expires_hours: 24,
            cookie_secure: false,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}
