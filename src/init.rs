use env_logger::Env;

/// 初始化日誌系統（每個程序生命週期呼叫一次）
///
/// 預設只輸出 warn 以上，可用 `RUST_LOG` 覆寫
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();
}
