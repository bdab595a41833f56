//! 离线演示：用内置签名库分析一个模拟的拦截页
//! 运行：RUST_LOG=debug cargo run --example probe_demo
use rswebprobe::{DetectionConfig, DetectionEngine, DetectionMode, PageEvidence, ProbeResult};

const CHALLENGE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Just a moment...</title>
  <script src="https://www.google.com/recaptcha/api.js" async defer></script>
</head>
<body>
  <div id="challenge-stage">
    <p>Checking your browser before accessing shop.example.</p>
    <div class="g-recaptcha" data-sitekey="6Lc_demo"></div>
  </div>
  <script src="/cdn-cgi/challenge-platform/h/b/orchestrate/jsch/v1"></script>
</body>
</html>"#;

fn main() -> ProbeResult<()> {
    env_logger::init();

    let config = DetectionConfig::builder()
        .mode(DetectionMode::Normal)
        .include_raw_data(true)
        .build();
    let engine = DetectionEngine::with_embedded_signatures(config)?;

    let evidence = PageEvidence::builder("https://shop.example/")
        .status(403)
        .header("Server", "cloudflare")
        .header("CF-RAY", "8a1b2c3d4e5f-AMS")
        .header("Content-Type", "text/html; charset=UTF-8")
        .header("Set-Cookie", "__cf_bm=abc123; path=/; HttpOnly")
        .body(CHALLENGE_PAGE)
        .latency_ms(812)
        .build()?;

    let result = engine.analyze(&evidence);
    println!("{}", result);
    println!("{}", result.to_json_pretty()?);
    Ok(())
}
