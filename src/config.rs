use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::net::{SocketAddr, IpAddr};
use std::default::Default;
use std::fmt::{Display, Formatter};

use clap::Parser;

use crate::error::{self, Context};
use crate::path::{self, Kind};

mod shape;

pub type Kdf = hkdf::Hkdf<sha3::Sha3_512>;

pub const DEFAULT_PORT: u16 = 8080;

pub trait TryDefault: Sized {
    type Error;

    fn try_default() -> Result<Self, Self::Error>;
}

#[derive(Debug, Parser)]
#[command(author, version ,about, long_about = None)]
pub struct CliArgs {
    /// a config file to load, later files override earlier ones
    #[arg(long)]
    config: Vec<PathBuf>
}

pub struct Config {
    pub settings: Settings,
    pub kdf: Kdf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

pub fn get_config() -> error::Result<Config> {
    Config::from_args(CliArgs::parse())
}

impl Config {
    pub fn from_args(args: CliArgs) -> error::Result<Self> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for Settings")?;
        let mut settings = Settings::try_default()?;

        for config_path in args.config {
            let full = path::resolve(&cwd, config_path);

            tracing::debug!("loading config file \"{}\"", full.display());

            let loaded = Self::load_file(&full)?;
            let src = SrcFile::new(&full)?;
            let dot = DotPath::new("settings");

            settings.merge(&src, dot, loaded)?;
        }

        if settings.listeners.is_empty() {
            settings.listeners.insert(String::from("main"), Listener::default());
        }

        match path::kind(&settings.data).context("failed to retrieve metadata for settings.data")? {
            Kind::Dir => {}
            Kind::Missing => {
                tracing::info!("creating data directory \"{}\"", settings.data.display());

                std::fs::create_dir_all(&settings.data)
                    .context("failed to create settings.data directory")?;
            }
            _ => {
                return Err(error::Error::new().message(
                    "settings.data is not a directory"
                ));
            }
        }

        require_dir(&settings.templates.directory, "settings.templates.directory")?;
        require_dir(&settings.assets.directory, "settings.assets.directory")?;

        tracing::debug!("{settings:#?}");

        let kdf = Kdf::new(None, settings.master_key.as_bytes());

        Ok(Config {
            settings,
            kdf
        })
    }

    fn load_file(path: &Path) -> error::Result<shape::Settings> {
        let ext = path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .context(format!("config file has no usable extension: \"{}\"", path.display()))?;

        let contents = std::fs::read_to_string(path)
            .context(format!("failed to read config file: \"{}\"", path.display()))?;

        match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .context(format!("invalid yaml config file: \"{}\"", path.display())),
            "json" => serde_json::from_str(&contents)
                .context(format!("invalid json config file: \"{}\"", path.display())),
            _ => Err(error::Error::new().message(format!(
                "unknown type of config file: \"{}\"", path.display()
            )))
        }
    }
}

/// the file a value was loaded from. relative paths resolve against its
/// parent directory
struct SrcFile<'a> {
    parent: &'a Path,
    src: &'a Path,
}

impl<'a> SrcFile<'a> {
    fn new(src: &'a Path) -> error::Result<Self> {
        let parent = src.parent().context(format!(
            "config file has no parent directory: \"{}\"", src.display()
        ))?;

        Ok(SrcFile {
            parent,
            src
        })
    }
}

impl<'a> Display for SrcFile<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.src.display())
    }
}

/// location of a value within the settings, e.g. `settings.listeners."main".addr`
#[derive(Clone)]
struct DotPath(String);

impl DotPath {
    fn new(name: &str) -> Self {
        DotPath(name.to_owned())
    }

    fn push(&self, name: impl Display) -> Self {
        DotPath(format!("{}.{name}", self.0))
    }
}

impl Display for DotPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub struct Settings {
    pub data: PathBuf,
    pub master_key: String,
    pub listeners: HashMap<String, Listener>,
    pub templates: Templates,
    pub assets: Assets,
    pub sec: Sec,
    pub db: Db,
    pub assistant: Assistant,
}

impl Settings {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath, settings: shape::Settings) -> error::Result<()> {
        if let Some(data) = settings.data {
            self.data = resolve_path(data, src);
        }

        if let Some(master_key) = settings.master_key {
            self.master_key = master_key;
        }

        if let Some(listeners) = settings.listeners {
            let listeners_dot = dot.push("listeners");

            for (key, listener) in listeners {
                let listener_dot = listeners_dot.push(format!("\"{key}\""));

                self.listeners.entry(key)
                    .or_default()
                    .merge(src, listener_dot, listener)?;
            }
        }

        if let Some(templates) = settings.templates {
            self.templates.merge(src, dot.push("templates"), templates)?;
        }

        if let Some(assets) = settings.assets {
            self.assets.merge(src, dot.push("assets"), assets)?;
        }

        if let Some(sec) = settings.sec {
            self.sec.merge(sec);
        }

        if let Some(db) = settings.db {
            self.db.merge(db);
        }

        if let Some(assistant) = settings.assistant {
            self.assistant.merge(src, dot.push("assistant"), assistant)?;
        }

        Ok(())
    }
}

impl TryDefault for Settings {
    type Error = error::Error;

    fn try_default() -> Result<Self, Self::Error> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for Settings")?;

        Ok(Settings {
            data: cwd.join("data"),
            master_key: "assist_master_key_secret".into(),
            listeners: HashMap::new(),
            templates: Templates {
                dev_mode: false,
                directory: cwd.join("templates"),
            },
            assets: Assets {
                directory: cwd.join("static"),
            },
            sec: Sec::default(),
            db: Db::default(),
            assistant: Assistant::default(),
        })
    }
}

#[derive(Debug)]
pub struct Listener {
    pub addr: SocketAddr,
}

impl Listener {
    fn merge(&mut self, src: &SrcFile<'_>, dot_path: DotPath, listener: shape::Listener) -> error::Result<()> {
        self.addr = parse_addr(&listener.addr).context(format!(
            "{dot_path}.addr invalid: \"{}\" file: {src}", listener.addr
        ))?;

        Ok(())
    }
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        }
    }
}

/// accepts either a full socket address or just an ip that will use the
/// default port
fn parse_addr(given: &str) -> Option<SocketAddr> {
    match SocketAddr::from_str(given) {
        Ok(valid) => Some(valid),
        Err(_) => IpAddr::from_str(given)
            .ok()
            .map(|ip| SocketAddr::from((ip, DEFAULT_PORT)))
    }
}

#[derive(Debug)]
pub struct Templates {
    pub dev_mode: bool,
    pub directory: PathBuf,
}

impl Templates {
    fn merge(&mut self, src: &SrcFile<'_>, dot_path: DotPath, templates: shape::Templates) -> error::Result<()> {
        if let Some(dev_mode) = templates.dev_mode {
            self.dev_mode = dev_mode;
        }

        if let Some(directory) = templates.directory {
            self.directory = check_dir(directory, src, dot_path.push("directory"))?;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct Assets {
    pub directory: PathBuf,
}

impl Assets {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath, assets: shape::Assets) -> error::Result<()> {
        if let Some(directory) = assets.directory {
            self.directory = check_dir(directory, src, dot.push("directory"))?;
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Sec {
    pub session: Session,
}

impl Sec {
    fn merge(&mut self, sec: shape::Sec) {
        if let Some(session) = sec.session {
            if let Some(secure) = session.secure {
                self.session.secure = secure;
            }

            if let Some(domain) = session.domain {
                self.session.domain = Some(domain);
            }
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub secure: bool,
    pub domain: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            secure: true,
            domain: None,
        }
    }
}

#[derive(Debug)]
pub struct Db {
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub dbname: String
}

impl Db {
    fn merge(&mut self, db: shape::Db) {
        if let Some(user) = db.user {
            self.user = user;
        }

        if let Some(password) = db.password {
            self.password = Some(password);
        }

        if let Some(host) = db.host {
            self.host = host;
        }

        if let Some(port) = db.port {
            self.port = port;
        }

        if let Some(dbname) = db.dbname {
            self.dbname = dbname;
        }
    }
}

impl Default for Db {
    fn default() -> Self {
        Db {
            user: "postgres".into(),
            password: None,
            host: "localhost".into(),
            port: 5432,
            dbname: "assist".into(),
        }
    }
}

#[derive(Debug)]
pub struct Assistant {
    pub history_limit: usize,
    pub generator: Option<Generator>,
    pub translator: Option<Service>,
    pub speech: Option<Service>,
    pub information: Option<Service>,
}

impl Assistant {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath, assistant: shape::Assistant) -> error::Result<()> {
        if let Some(history_limit) = assistant.history_limit {
            self.history_limit = history_limit;
        }

        if let Some(generator) = assistant.generator {
            let generator_dot = dot.push("generator");

            if let Some(found) = &mut self.generator {
                found.merge(src, generator_dot, generator)?;
            } else {
                let endpoint = generator.endpoint.clone().context(format!(
                    "{generator_dot}.endpoint is required. file: {src}"
                ))?;

                let mut default = Generator::new(endpoint);
                default.merge(src, generator_dot, generator)?;

                self.generator = Some(default);
            }
        }

        if let Some(translator) = assistant.translator {
            Service::merge_into(&mut self.translator, src, dot.push("translator"), translator, None)?;
        }

        if let Some(speech) = assistant.speech {
            Service::merge_into(&mut self.speech, src, dot.push("speech"), speech, None)?;
        }

        if let Some(information) = assistant.information {
            Service::merge_into(
                &mut self.information,
                src,
                dot.push("information"),
                information,
                Some(assist_lib::assistant::lookup::WIKIPEDIA_API),
            )?;
        }

        Ok(())
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Assistant {
            history_limit: assist_lib::assistant::conversation::DEFAULT_HISTORY_LIMIT,
            generator: None,
            translator: None,
            speech: None,
            information: None,
        }
    }
}

/// hosted text generation. when missing the builtin local generator is used
#[derive(Debug)]
pub struct Generator {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_length: u32,
}

impl Generator {
    fn new(endpoint: String) -> Self {
        Generator {
            endpoint,
            token: None,
            timeout_secs: 30,
            max_length: assist_lib::assistant::generate::DEFAULT_MAX_LENGTH,
        }
    }

    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath, generator: shape::Generator) -> error::Result<()> {
        if let Some(endpoint) = generator.endpoint {
            url::Url::parse(&endpoint).context(format!(
                "{dot}.endpoint is not a valid url. file: {src}"
            ))?;

            self.endpoint = endpoint;
        }

        if let Some(token) = generator.token {
            self.token = Some(token);
        }

        if let Some(timeout_secs) = generator.timeout_secs {
            if timeout_secs == 0 {
                return Err(error::Error::new().message(format!(
                    "{dot}.timeout_secs cannot be 0. file: {src}"
                )));
            }

            self.timeout_secs = timeout_secs;
        }

        if let Some(max_length) = generator.max_length {
            self.max_length = max_length;
        }

        Ok(())
    }
}

/// an optional remote capability of the assistant. left out when not declared
#[derive(Debug)]
pub struct Service {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Service {
    /// merges into an existing service or creates one. `fallback` is used
    /// when the file does not name an endpoint
    fn merge_into(
        target: &mut Option<Service>,
        src: &SrcFile<'_>,
        dot: DotPath,
        service: shape::Service,
        fallback: Option<&str>,
    ) -> error::Result<()> {
        if let Some(found) = target {
            return found.merge(src, dot, service);
        }

        let endpoint = service.endpoint.clone()
            .or_else(|| fallback.map(str::to_owned))
            .context(format!("{dot}.endpoint is required. file: {src}"))?;

        let mut created = Service {
            endpoint,
            token: None,
            timeout_secs: 30,
        };
        created.merge(src, dot, service)?;

        *target = Some(created);

        Ok(())
    }

    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath, service: shape::Service) -> error::Result<()> {
        if let Some(endpoint) = service.endpoint {
            self.endpoint = endpoint;
        }

        url::Url::parse(&self.endpoint).context(format!(
            "{dot}.endpoint is not a valid url. file: {src}"
        ))?;

        if let Some(token) = service.token {
            self.token = Some(token);
        }

        if let Some(timeout_secs) = service.timeout_secs {
            if timeout_secs == 0 {
                return Err(error::Error::new().message(format!(
                    "{dot}.timeout_secs cannot be 0. file: {src}"
                )));
            }

            self.timeout_secs = timeout_secs;
        }

        Ok(())
    }
}

fn resolve_path(given: PathBuf, src: &SrcFile<'_>) -> PathBuf {
    path::resolve(src.parent, given)
}

fn require_dir(dir: &Path, name: &str) -> error::Result<()> {
    match path::kind(dir).context(format!("failed to retrieve metadata for {name}"))? {
        Kind::Dir => Ok(()),
        Kind::Missing => Err(error::Error::new().message(format!(
            "{name} does not exist: \"{}\"", dir.display()
        ))),
        _ => Err(error::Error::new().message(format!(
            "{name} is not a directory"
        ))),
    }
}

fn check_dir(given: PathBuf, src: &SrcFile<'_>, dot: DotPath) -> error::Result<PathBuf> {
    let full = resolve_path(given, src);

    tracing::debug!("{dot} {src} checking {}", full.display());

    match path::kind(&full).context(format!(
        "{dot} failed to retrieve metadata for: {src}"
    ))? {
        Kind::Dir => Ok(full),
        Kind::Missing => Err(error::Error::new().message(format!(
            "{dot} {src} was not found"
        ))),
        _ => Err(error::Error::new().message(format!(
            "{dot} is not a directory in: {src}"
        ))),
    }
}
