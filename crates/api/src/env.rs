use remark_common::EnvVars;

pub struct ApiServerEnv {
    pub port: String,
    pub store_backend: String,
    pub database_url: String,
}

impl EnvVars for ApiServerEnv {
    fn load() -> Self {
        Self {
            port: std::env::var("PORT").unwrap_or("3000".to_string()),
            store_backend: std::env::var("STORE_BACKEND").unwrap_or("postgres".to_string()),
            database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
        }
    }

    fn get_env_var(&self, key: &str) -> String {
        match key {
            "PORT" => self.port.clone(),
            "STORE_BACKEND" => self.store_backend.clone(),
            "DATABASE_URL" => self.database_url.clone(),
            _ => panic!("{} is not set", key),
        }
    }
}
