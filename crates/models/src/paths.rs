//! API paths, relative to the API root.

pub const INFO: &str = "api/info/";
pub const ME: &str = "api/v1/me";
pub const USER_BY_FULLNAME: &str = "api/user_data_by_account_ids";
pub const BLOCK_USER: &str = "api/block_user/";
pub const ADD_WHITELISTED: &str = "api/add_whitelisted";
pub const REMOVE_WHITELISTED: &str = "api/remove_whitelisted";
pub const SHOW_COMMENT: &str = "api/show_comment/";
pub const MOD_NOTES: &str = "api/mod/notes";

pub fn submission(id: &str) -> String {
    format!("comments/{id}/")
}

pub fn subreddit_about(name: &str) -> String {
    format!("r/{name}/about/")
}

pub fn subreddit_listing(name: &str, sort: &str) -> String {
    format!("r/{name}/{sort}/")
}

pub fn subreddit_moderators(name: &str) -> String {
    format!("r/{name}/about/moderators/")
}

pub fn unfriend(subreddit: &str) -> String {
    format!("r/{subreddit}/api/unfriend/")
}

pub fn user_about(name: &str) -> String {
    format!("user/{name}/about/")
}

pub fn user_listing(name: &str, section: &str) -> String {
    format!("user/{name}/{section}/")
}

pub fn friend_v1(name: &str) -> String {
    format!("api/v1/me/friends/{name}")
}

pub fn moderated(name: &str) -> String {
    format!("user/{name}/moderated_subreddits/")
}

pub fn multireddit_user(name: &str) -> String {
    format!("api/multi/user/{name}/")
}

pub fn trophies(name: &str) -> String {
    format!("api/v1/user/{name}/trophies")
}
