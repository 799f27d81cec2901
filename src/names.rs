pub const REGISTER_URL: &str = "/register";
pub const LOGIN_URL: &str = "/login";
pub const LOGOUT_URL: &str = "/logout";
pub const PROFILE_URL: &str = "/profile";
pub const CHANGE_PASSWORD_URL: &str = "/profile/change-password";

pub const QUIZ_URL: &str = "/quiz";
pub const QUIZ_ATTEMPT_URL: &str = "/quiz/attempt";
pub const QUIZ_REVIEW_URL: &str = "/quiz/review";
pub const QUIZ_HISTORY_URL: &str = "/quiz/history";
pub const GENERATE_EXERCISE_URL: &str = "/generate-exercise";
pub const LESSONS_URL: &str = "/lessons";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub const MIN_PASSWORD_LEN: usize = 8;

pub const MIN_QUESTION_OPTIONS: usize = 4;
pub const MAX_QUESTION_OPTIONS: usize = 10;

pub const DEFAULT_HISTORY_PAGE_SIZE: i64 = 10;
pub const DEFAULT_LESSON_PAGE_SIZE: i64 = 12;

pub fn fetch_exercise_url(public_id: &str) -> String {
    format!("/fetch-exercise/{public_id}")
}
