#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Principal {
    Admin,
    Client { customer_id: i32 },
    Restaurant { restaurant_id: i32 },
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }

    pub fn customer_id(&self) -> Option<i32> {
        match self {
            Principal::Client { customer_id } => Some(*customer_id),
            _ => None,
        }
    }

    pub fn restaurant_id(&self) -> Option<i32> {
        match self {
            Principal::Restaurant { restaurant_id } => Some(*restaurant_id),
            _ => None,
        }
    }
}
