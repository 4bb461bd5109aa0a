use statsig_client::StatsigUser;

/// Custom id type and metadata key identifying this integration
pub const SDK_TYPE_KEY: &str = "sdk_type";

/// Value recorded under [`SDK_TYPE_KEY`]
pub const SDK_TYPE: &str = "azureai-rust";

/// Tag a user so Statsig attributes its events to this integration
///
/// Starts from an empty user when none is given.
pub fn statsig_user(user: Option<StatsigUser>) -> StatsigUser {
    let mut user = user.unwrap_or_default();
    user.add_custom_id(SDK_TYPE_KEY, SDK_TYPE);
    user
}
