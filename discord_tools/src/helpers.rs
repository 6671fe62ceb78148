const DISCORD_CDN_BASE: &str = "https://cdn.discordapp.com";

/// The CDN URL for a user's avatar image.
pub fn avatar_url(user_id: &str, avatar_hash: &str) -> String {
    format!("{DISCORD_CDN_BASE}/avatars/{user_id}/{avatar_hash}.png")
}
