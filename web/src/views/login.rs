use dioxus::prelude::*;

/// Text for the `error` codes the auth routes and the layout redirect with.
fn error_message(code: &str) -> &str {
    match code {
        "invalid-credentials" => "Invalid email or password.",
        "unavailable" => "Sign-in is unavailable right now, please try again.",
        "session-expired" => "Your session has expired, please sign in again.",
        other => other,
    }
}

#[component]
pub fn Login(error: Option<String>) -> Element {
    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "Rentit" }
                    p { class: "login-subtitle", "Property management" }
                }
                if let Some(code) = error.as_deref() {
                    div { class: "login-error", "{error_message(code)}" }
                }
                form {
                    action: "/auth/login",
                    method: "post",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "email", "Email" }
                        input {
                            id: "email",
                            name: "email",
                            class: "form-input",
                            r#type: "email",
                            required: true,
                            autocomplete: "username",
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "password", "Password" }
                        input {
                            id: "password",
                            name: "password",
                            class: "form-input",
                            r#type: "password",
                            required: true,
                            autocomplete: "current-password",
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary login-btn",
                        "Sign in"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_get_friendly_text() {
        assert_eq!(error_message("invalid-credentials"), "Invalid email or password.");
        assert_eq!(error_message("something else"), "something else");
    }
}
