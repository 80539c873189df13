use std::net::SocketAddr;
use std::time::Duration;

use solitaire_core::RenderOptions;
use tracing::warn;

pub const DEFAULT_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 25917);
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// 服务器配置，从环境变量读取
///
/// - `SOLITAIRE_ADDR`：监听地址，默认 `0.0.0.0:25917`
/// - `SOLITAIRE_DEBUG`：为 `1`/`true`/`yes` 时所有牌按正面渲染
/// - `SOLITAIRE_SESSION_IDLE_SECS`：会话多久没有操作后被清理，默认 1800 秒
/// - `SOLITAIRE_SWEEP_INTERVAL_SECS`：清理任务的运行间隔，默认 60 秒
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub render: RenderOptions,
    pub session_idle: Duration,
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: SocketAddr::from(DEFAULT_ADDR),
            render: RenderOptions::default(),
            session_idle: DEFAULT_SESSION_IDLE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 非法的取值会被忽略并退回默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ServerConfig::default();

        if let Some(raw) = lookup("SOLITAIRE_ADDR") {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => config.addr = addr,
                Err(e) => warn!("SOLITAIRE_ADDR={} 无法解析 ({})，使用默认地址 {}", raw, e, config.addr),
            }
        }

        if let Some(raw) = lookup("SOLITAIRE_DEBUG") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.render.reveal_all = true,
                "" | "0" | "false" | "no" => {}
                other => warn!("SOLITAIRE_DEBUG={} 无法识别，调试显示保持关闭", other),
            }
        }

        if let Some(secs) = positive_secs(&lookup, "SOLITAIRE_SESSION_IDLE_SECS") {
            config.session_idle = secs;
        }
        if let Some(secs) = positive_secs(&lookup, "SOLITAIRE_SWEEP_INTERVAL_SECS") {
            config.sweep_interval = secs;
        }

        config
    }
}

/// 读取一个正整数秒数；0 或无法解析时给出警告并返回 None
fn positive_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("{}={} 不是正整数秒数，使用默认值", key, raw);
            None
        }
    }
}
