//! 构建配置加载
//!
//! 配置文件（TOML/JSON，按扩展名识别）之上叠加 `TANG_` 前缀的环境变量，
//! 嵌套字段以 `__` 分隔，例如 `TANG_LOGGING__LEVEL=debug`。

use crate::errors::CompositionResult;
use std::path::Path;
use tang_common::HierarchyOptions;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "TANG";

/// 加载构建配置；未提供文件时只读取环境变量，缺省项取默认值
pub fn load_options(path: Option<&Path>) -> CompositionResult<HierarchyOptions> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        debug!(path = %path.display(), "加载配置文件");
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let options: HierarchyOptions = settings.try_deserialize()?;
    debug!(
        max_closure_rounds = options.max_closure_rounds,
        catalogs = options.catalogs.len(),
        roots = options.roots.len(),
        "构建配置加载完成"
    );
    Ok(options)
}
