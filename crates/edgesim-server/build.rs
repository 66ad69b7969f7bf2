//! rust-embed needs `frontend/dist` at compile time. Without a trunk build,
//! write a stand-in page so the server still builds and says what is missing.

use std::fs;
use std::path::Path;

const PLACEHOLDER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8" /><title>edgesim</title></head>
<body>
<h1>edgesim</h1>
<p>The dashboard was not built. Run <code>trunk build --release</code> in
<code>frontend/</code> and rebuild the server.</p>
<p>The API routes <code>/run_algorithm/{name}</code> and <code>/get_overview</code>
are forwarded either way.</p>
</body>
</html>
"#;

fn main() {
    let dist = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../frontend/dist");
    let index = dist.join("index.html");

    if !index.exists() {
        fs::create_dir_all(&dist).expect("create frontend/dist");
        fs::write(&index, PLACEHOLDER).expect("write placeholder index.html");
    }

    println!("cargo:rerun-if-changed=../../frontend/dist");
}
