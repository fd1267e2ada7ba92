use dotenvy::var;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_secs: u64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = var("JWT_SECRET").expect("JWT_SECRET must be set");
        let issuer = var("JWT_ISSUER").unwrap_or_else(|_| "deliverytech".to_string());
        let audience = var("JWT_AUDIENCE").unwrap_or_else(|_| "deliverytech-api".to_string());
        let expiry_secs = var("JWT_EXPIRY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600);
        Self {
            secret,
            issuer,
            audience,
            expiry_secs,
        }
    }
}
