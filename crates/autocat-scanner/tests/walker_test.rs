use autocat_browser::{BrowserError, ManagedSession, PageActions, SessionLauncher};
use autocat_core::{AppConfig, SiteConfig};
use autocat_scanner::{
    BrandFilter, CatalogWalker, Limits, RunController, RunError, RunOutput, RunRequest, ScanError,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const BASE: &str = "http://catalog.test";

fn url(path: &str) -> String {
    format!("{BASE}/Catalog/{path}")
}

const BRANDS_PAGE: &str = r#"<html><body>
    <a href="/">Home</a>
    <a href="/Catalog/autoturism-identificare-vehicul-121">VW</a>
    <a href="/Catalog/autoturism-identificare-vehicul-5">AUDI</a>
    <a href="/Catalog/autoturism-identificare-vehicul-16">BMW</a>
    <a href="/Catalog/autoturism-identificare-vehicul-40">OPEL</a>
    <a href="/Catalog/autoturism-identificare-vehicul-60">SKODA</a>
</body></html>"#;

const VW_PAGE: &str = r#"<html><body><table>
    <tr><th>Model</th></tr>
    <tr><td><a href="/Catalog/autoturism-identificare-vehicul-121-4501">Golf IV (08/97-06/05)</a></td></tr>
    <tr><td><a href="/Catalog/autoturism-identificare-vehicul-121-4502">Passat (1996-2000)</a></td></tr>
    <tr><td><a href="/Catalog/autoturism-identificare-vehicul-121-4503">Polo (1994-)</a></td></tr>
</table></body></html>"#;

const SKODA_PAGE: &str = r#"<html><body><table>
    <tr><td><a href="/Catalog/autoturism-identificare-vehicul-60-7001">Octavia (1996-2004)</a></td></tr>
</table></body></html>"#;

const GOLF_ENGINES: &str = r"<html><body><table>
    <tr><th>Tip</th><th>An</th><th>KW</th><th>CP</th><th>ccm</th><th>Cilindri</th><th>Carburant</th><th>Cod motor</th></tr>
    <tr><td>1.9 TDI</td><td>09/97 - 06/05</td><td>66</td><td>90</td><td>1.9</td><td>4</td><td></td><td>AHU</td></tr>
    <tr><td>1.6</td><td>1997-2000</td><td>74</td><td>101</td><td>1595</td><td>4</td><td>Benzina</td><td>AKL</td></tr>
</table></body></html>";

const POLO_ENGINES: &str = r"<html><body><table>
    <tr><th>Tip</th><th>An</th><th>KW</th><th>CP</th><th>ccm</th><th>Cilindri</th><th>Carburant</th><th>Cod motor</th></tr>
    <tr><td>1.4</td><td>1994-</td><td>44</td><td>60</td><td>1390</td><td>4</td><td>Benzina</td><td>AEX</td></tr>
</table></body></html>";

#[derive(Default)]
struct FakeState {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    current: Mutex<Option<String>>,
    visits: Mutex<Vec<String>>,
    launches: AtomicUsize,
    shutdowns: AtomicUsize,
}

/// In-memory catalog site served through `PageActions`.
#[derive(Clone)]
struct FakePage {
    state: Arc<FakeState>,
}

impl FakePage {
    fn catalog() -> Self {
        Self::with_failing(&[])
    }

    fn with_failing(failing: &[String]) -> Self {
        let mut pages = HashMap::new();
        pages.insert(
            url("autoturism-identificare-vehicul/39849642;39850140"),
            BRANDS_PAGE.to_string(),
        );
        pages.insert(url("autoturism-identificare-vehicul-121"), VW_PAGE.to_string());
        pages.insert(url("autoturism-identificare-vehicul-60"), SKODA_PAGE.to_string());
        pages.insert(url("autoturism-identificare-vehicul-4501"), GOLF_ENGINES.to_string());
        pages.insert(url("autoturism-identificare-vehicul-4502"), GOLF_ENGINES.to_string());
        pages.insert(url("autoturism-identificare-vehicul-4503"), POLO_ENGINES.to_string());
        pages.insert(url("autoturism-identificare-vehicul-7001"), POLO_ENGINES.to_string());

        Self {
            state: Arc::new(FakeState {
                pages,
                failing: failing.iter().cloned().collect(),
                ..FakeState::default()
            }),
        }
    }

    fn visits(&self) -> Vec<String> {
        self.state.visits.lock().unwrap().clone()
    }

    fn shutdowns(&self) -> usize {
        self.state.shutdowns.load(Ordering::SeqCst)
    }

    fn launches(&self) -> usize {
        self.state.launches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PageActions for FakePage {
    async fn navigate(&self, url: &str) -> autocat_browser::Result<()> {
        self.state.visits.lock().unwrap().push(url.to_string());
        if self.state.failing.contains(url) || !self.state.pages.contains_key(url) {
            return Err(BrowserError::NavigationError(format!("{url} unavailable")));
        }
        *self.state.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_network_idle(&self) -> autocat_browser::Result<()> {
        Ok(())
    }

    async fn rendered_markup(&self) -> autocat_browser::Result<String> {
        let current = self.state.current.lock().unwrap().clone();
        current
            .and_then(|u| self.state.pages.get(&u).cloned())
            .ok_or_else(|| BrowserError::ChromiumError("no page loaded".to_string()))
    }

    async fn screenshot(&self, path: &Path) -> autocat_browser::Result<()> {
        std::fs::write(path, b"png").map_err(|e| BrowserError::ScreenshotError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ManagedSession for FakePage {
    async fn shutdown(&mut self) -> autocat_browser::Result<()> {
        self.state.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeLauncher {
    page: FakePage,
    fail: bool,
}

#[async_trait::async_trait]
impl SessionLauncher for FakeLauncher {
    type Session = FakePage;

    async fn launch(&self) -> autocat_browser::Result<FakePage> {
        self.page.state.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BrowserError::ChromiumError("no chromium".to_string()));
        }
        Ok(self.page.clone())
    }
}

fn site() -> SiteConfig {
    SiteConfig {
        base_url: BASE.to_string(),
        ..SiteConfig::default()
    }
}

fn unlimited() -> Limits {
    Limits::default()
}

fn config(debug_dir: Option<&Path>) -> AppConfig {
    let mut config = AppConfig::default();
    config.site = site();
    config.limits.max_brands = None;
    config.limits.max_models = None;
    config.limits.max_engines = None;
    config.run.pacing_ms = 0;
    config.run.debug_dir = debug_dir.map(Path::to_path_buf);
    config
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_engine_failure_keeps_model_and_siblings() {
    let page = FakePage::with_failing(&[url("autoturism-identificare-vehicul-4502")]);
    let site = site();
    let walker = CatalogWalker::new(&page, &site, unlimited()).with_pacing(Duration::ZERO);

    let report = walker.walk(&BrandFilter::from_names(["vw"])).await.unwrap();

    let vw = report.catalog.brand("VW").expect("VW kept");
    assert_eq!(vw.info.country, "Unknown");
    assert_eq!(vw.models.len(), 3);
    assert!(vw.models["Passat"].engines.is_empty());
    assert_eq!(vw.models["Passat"].info.year_start.as_deref(), Some("1996"));
    assert_eq!(vw.models["Golf IV"].engines.len(), 2);
    assert_eq!(vw.models["Polo"].engines.len(), 1);
    assert!(vw.models["Polo"].info.year_end.is_none());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].brand, "VW");
    assert_eq!(report.failures[0].model.as_deref(), Some("Passat"));
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_model_failure_keeps_brand_with_no_models() {
    let page = FakePage::catalog();
    let site = site();
    let walker = CatalogWalker::new(&page, &site, unlimited()).with_pacing(Duration::ZERO);

    let report = walker
        .walk(&BrandFilter::from_names(["AUDI", "VW"]))
        .await
        .unwrap();

    assert_eq!(report.catalog.len(), 2);
    let audi = report.catalog.brand("AUDI").expect("AUDI kept");
    assert!(audi.models.is_empty());
    assert_eq!(report.catalog.brand("VW").unwrap().models.len(), 3);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].brand, "AUDI");
    assert!(report.failures[0].model.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_pacing_follows_successful_engine_fetches_only() {
    let page = FakePage::with_failing(&[url("autoturism-identificare-vehicul-4502")]);
    let site = site();
    let walker =
        CatalogWalker::new(&page, &site, unlimited()).with_pacing(Duration::from_millis(100));

    let started = tokio::time::Instant::now();
    let report = walker.walk(&BrandFilter::from_names(["VW"])).await.unwrap();
    let elapsed = started.elapsed();

    // Golf IV and Polo succeed, Passat fails
    assert_eq!(report.failures.len(), 1);
    assert_eq!(elapsed, Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_failed_model_page_is_not_paced() {
    let page = FakePage::catalog();
    let site = site();
    let walker =
        CatalogWalker::new(&page, &site, unlimited()).with_pacing(Duration::from_millis(100));

    let started = tokio::time::Instant::now();
    let report = walker.walk(&BrandFilter::from_names(["AUDI"])).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_brand_limit_keeps_first_by_name() {
    let page = FakePage::catalog();
    let site = site();
    let limits = Limits {
        max_brands: Some(2),
        ..Limits::default()
    };
    let walker = CatalogWalker::new(&page, &site, limits).with_pacing(Duration::ZERO);

    let report = walker.walk(&BrandFilter::All).await.unwrap();

    let names: Vec<_> = report.catalog.brands().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["AUDI", "BMW"]);
}

#[tokio::test]
async fn test_filter_applies_before_brand_limit() {
    let page = FakePage::catalog();
    let site = site();
    let limits = Limits {
        max_brands: Some(1),
        ..Limits::default()
    };
    let walker = CatalogWalker::new(&page, &site, limits).with_pacing(Duration::ZERO);

    let report = walker
        .walk(&BrandFilter::from_names(["VW", "skoda"]))
        .await
        .unwrap();

    let names: Vec<_> = report.catalog.brands().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["SKODA"]);
    let octavia = &report.catalog.brand("SKODA").unwrap().models["Octavia"];
    assert_eq!(octavia.engines[0].code, "AEX");
}

#[tokio::test]
async fn test_model_and_engine_limits() {
    let page = FakePage::catalog();
    let site = site();
    let limits = Limits {
        max_brands: None,
        max_models: Some(1),
        max_engines: Some(1),
    };
    let walker = CatalogWalker::new(&page, &site, limits).with_pacing(Duration::ZERO);

    let report = walker.walk(&BrandFilter::from_names(["VW"])).await.unwrap();

    let vw = report.catalog.brand("VW").unwrap();
    assert_eq!(vw.models.len(), 1);
    let golf = &vw.models["Golf IV"];
    assert_eq!(golf.engines.len(), 1);
    assert_eq!(golf.engines[0].description, "1.6");
    assert!(!page
        .visits()
        .contains(&url("autoturism-identificare-vehicul-4503")));
}

#[tokio::test]
async fn test_brand_page_failure_fails_walk() {
    let page = FakePage::with_failing(&[url("autoturism-identificare-vehicul/39849642;39850140")]);
    let site = site();
    let walker = CatalogWalker::new(&page, &site, unlimited()).with_pacing(Duration::ZERO);

    let result = walker.walk(&BrandFilter::All).await;

    assert!(matches!(result, Err(ScanError::Fetch { .. })));
}

#[tokio::test]
async fn test_full_run_writes_catalog_and_shuts_down() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("catalog.json");
    let page = FakePage::catalog();
    let controller = RunController::new(
        FakeLauncher {
            page: page.clone(),
            fail: false,
        },
        &config(None),
    );
    let request = RunRequest {
        mode: "full".to_string(),
        brand_filter: vec!["vw".to_string()],
        ..RunRequest::default()
    };

    let result = controller.execute(&request, &output).await.unwrap();

    assert!(matches!(result, RunOutput::Catalog(_)));
    assert_eq!(page.launches(), 1);
    assert_eq!(page.shutdowns(), 1);

    let json = read_json(&output);
    assert_eq!(json["VW"]["info"]["country"], "Unknown");
    assert!(json.get("AUDI").is_none());
    let golf = &json["VW"]["models"]["Golf IV"];
    assert_eq!(golf["info"]["yearStart"], "08/97");
    assert_eq!(golf["info"]["yearEnd"], "06/05");
    assert!(golf["info"]["bodyType"].is_null());

    let tdi = &golf["engines"][1];
    assert_eq!(tdi["code"], "AHU");
    assert_eq!(tdi["ccm"], 1900);
    assert_eq!(tdi["fuelType"], "Diesel");
}

#[tokio::test]
async fn test_brand_page_failure_writes_empty_and_shuts_down() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("catalog.json");
    let page = FakePage::with_failing(&[url("autoturism-identificare-vehicul/39849642;39850140")]);
    let controller = RunController::new(
        FakeLauncher {
            page: page.clone(),
            fail: false,
        },
        &config(None),
    );
    let request = RunRequest {
        mode: "full".to_string(),
        ..RunRequest::default()
    };

    let result = controller.execute(&request, &output).await;

    assert!(matches!(result, Err(RunError::Scan(ScanError::Fetch { .. }))));
    assert_eq!(page.shutdowns(), 1);
    assert_eq!(read_json(&output), serde_json::json!({}));
}

#[tokio::test]
async fn test_invalid_mode_writes_empty_without_launching() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("models.json");
    let page = FakePage::catalog();
    let controller = RunController::new(
        FakeLauncher {
            page: page.clone(),
            fail: false,
        },
        &config(None),
    );
    let request = RunRequest {
        mode: "models".to_string(),
        ..RunRequest::default()
    };

    let result = controller.execute(&request, &output).await;

    assert!(matches!(result, Err(RunError::InvalidMode(_))));
    assert_eq!(page.launches(), 0);
    assert_eq!(read_json(&output), serde_json::json!({}));
}

#[tokio::test]
async fn test_launch_failure_writes_empty() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("brands.json");
    let page = FakePage::catalog();
    let controller = RunController::new(
        FakeLauncher {
            page: page.clone(),
            fail: true,
        },
        &config(None),
    );
    let request = RunRequest {
        mode: "brands".to_string(),
        ..RunRequest::default()
    };

    let result = controller.execute(&request, &output).await;

    assert!(matches!(result, Err(RunError::Session(_))));
    assert_eq!(page.shutdowns(), 0);
    assert_eq!(read_json(&output), serde_json::json!({}));
}

#[tokio::test]
async fn test_list_modes() {
    let dir = TempDir::new().unwrap();
    let page = FakePage::catalog();
    let controller = RunController::new(
        FakeLauncher {
            page: page.clone(),
            fail: false,
        },
        &config(None),
    );

    let brands_out = dir.path().join("brands.json");
    let request = RunRequest {
        mode: "brands".to_string(),
        ..RunRequest::default()
    };
    controller.execute(&request, &brands_out).await.unwrap();
    let brands = read_json(&brands_out);
    assert_eq!(brands["brands"].as_array().unwrap().len(), 5);
    assert_eq!(brands["brands"][0]["name"], "AUDI");
    assert_eq!(brands["brands"][0]["id"], "5");

    let models_out = dir.path().join("models.json");
    let request = RunRequest {
        mode: "models".to_string(),
        brand_id: Some("121".to_string()),
        ..RunRequest::default()
    };
    controller.execute(&request, &models_out).await.unwrap();
    let models = read_json(&models_out);
    assert_eq!(models["models"][0]["name"], "Golf IV");
    assert_eq!(models["models"][0]["id"], "4501");
    assert_eq!(models["models"][0]["year_start"], "08/97");

    let engines_out = dir.path().join("engines.json");
    let request = RunRequest {
        mode: "engines".to_string(),
        model_id: Some("4503".to_string()),
        ..RunRequest::default()
    };
    controller.execute(&request, &engines_out).await.unwrap();
    let engines = read_json(&engines_out);
    assert_eq!(engines["engines"][0]["code"], "AEX");
    assert_eq!(engines["engines"][0]["yearStart"], "1994");

    assert_eq!(page.launches(), 3);
    assert_eq!(page.shutdowns(), 3);
}

#[tokio::test]
async fn test_debug_snapshots_written() {
    let dir = TempDir::new().unwrap();
    let debug_dir = dir.path().join("debug");
    let output = dir.path().join("brands.json");
    let controller = RunController::new(
        FakeLauncher {
            page: FakePage::catalog(),
            fail: false,
        },
        &config(Some(&debug_dir)),
    );
    let request = RunRequest {
        mode: "brands".to_string(),
        ..RunRequest::default()
    };

    controller.execute(&request, &output).await.unwrap();

    assert!(debug_dir.join("brands_page.png").exists());
    let html = std::fs::read_to_string(debug_dir.join("brands_page.html")).unwrap();
    assert!(html.contains("SKODA"));
}
