//! Static HTML pages for the browser-facing routes.

/// Account registration form, posted back to `/`.
pub const REGISTER: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Create account</title></head>
  <body>
    <h1>Create account</h1>
    <form method="post" action="/">
      <input type="text" name="name" placeholder="name" />
      <input type="email" name="email" placeholder="email" />
      <input type="submit" value="Create account" />
    </form>
  </body>
</html>
"#;

/// Shown after registration; displays the login credential offer QR code.
pub const CREATE_ACCOUNT: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Account created</title></head>
  <body>
    <h1>Account created</h1>
    <p>Scan the code below with your wallet to accept your login credential.</p>
    <img src="/qr.png" alt="login credential offer" />
  </body>
</html>
"#;

/// Login instructions page.
pub const LOGIN: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Login</title></head>
  <body>
    <h1>Login</h1>
    <p>Present your login credential from your wallet to continue.</p>
  </body>
</html>
"#;
