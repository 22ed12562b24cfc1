use axum::response::Html;
use filemaker_bridge_axum::FMB_ROUTE_PREFIX;

pub(crate) async fn index() -> Html<String> {
    let prefix = FMB_ROUTE_PREFIX.as_str();
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>FileMaker bridge demo</title></head>
<body>
  <h1>FileMaker bridge demo</h1>
  <form method="post" action="{prefix}/login">
    <input name="username" placeholder="FileMaker account">
    <input name="password" type="password" placeholder="Password">
    <button type="submit">Sign in</button>
  </form>
  <p><a href="{prefix}/oauth/initiate?redirect=true">Sign in with Microsoft</a></p>
  <p><a href="{prefix}/oauth/providers">Providers</a> | <a href="{prefix}/oauth/sessions">OAuth sessions</a> | <a href="{prefix}/session/health">Session health</a></p>
</body>
</html>
"#
    ))
}
