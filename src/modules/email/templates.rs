/// Subject and plain-text body for an outbound email
pub struct EmailContent {
    pub subject: String,
    pub text: String,
}

/// Build the account-verification email. The token sits on its own line so
/// it is easy to copy.
pub fn verification_email(first_name: &str, token: &str) -> EmailContent {
    let text = format!(
        "Hello {},\n\
        \n\
        Thank you for registering an account on the blog. To finish signing up \
        and activate your account, please use the verification token below:\n\
        \n\
        {}\n\
        \n\
        This verification token will expire in 24 hours. If it expires, you \
        will need to request a new one.\n\
        \n\
        If you did not register an account, please ignore this email.\n\
        \n\
        Thank you!",
        first_name, token
    );

    EmailContent {
        subject: "Verify your email address".to_string(),
        text,
    }
}

/// Build the password-reset email
pub fn reset_email(first_name: &str, token: &str) -> EmailContent {
    let text = format!(
        "Hello {},\n\
        \n\
        A password reset was requested for your account. Use the token below \
        to choose a new password:\n\
        \n\
        {}\n\
        \n\
        This token will expire in 30 minutes.\n\
        \n\
        If you did not request a password reset, please ignore this email.",
        first_name, token
    );

    EmailContent {
        subject: "Password reset request".to_string(),
        text,
    }
}
