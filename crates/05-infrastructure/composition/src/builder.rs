//! 类型层级构建器

use crate::errors::{CompositionError, CompositionResult};
use std::path::Path;
use std::sync::Arc;
use tang_common::{CatalogError, HierarchyOptions, LoggingOptions, TypeName};
use tang_di_abstractions::CatalogProvider;
use tang_di_impl::{
    provider_for_path, JsonCatalogProvider, TomlCatalogProvider, TypeCatalog, TypeHierarchy,
};
use tracing::{debug, info};
use tracing_subscriber::filter::{Directive, EnvFilter, LevelFilter};

/// 构建完成、闭包已收敛的类型层级，可在线程间只读共享
pub type ResolvedHierarchy = Arc<TypeHierarchy<TypeCatalog>>;

/// 类型层级构建器
///
/// 使用建造者模式收集类型目录与根类型，构建时依次加载目录、注册根类型并计算闭包。
pub struct HierarchyBuilder {
    /// 目录提供者列表
    providers: Vec<Box<dyn CatalogProvider>>,
    /// 直接加入的目录
    catalog: TypeCatalog,
    /// 根类型
    roots: Vec<TypeName>,
    /// 构建配置
    options: HierarchyOptions,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl HierarchyBuilder {
    /// 创建新的类型层级构建器
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            catalog: TypeCatalog::new(),
            roots: Vec::new(),
            options: HierarchyOptions::default(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 由构建配置创建：配置中的目录文件与根类型一并加入
    pub fn from_options(options: HierarchyOptions) -> Self {
        let mut builder = Self::new();
        for path in &options.catalogs {
            debug!(path = %path.display(), "添加配置中的类型目录");
            builder.providers.push(provider_for_path(path));
        }
        builder.roots.extend(options.roots.iter().cloned());
        builder.options = options;
        builder
    }

    /// 添加 JSON 类型目录
    pub fn add_catalog_json<P: AsRef<Path>>(mut self, path: P) -> CompositionResult<Self> {
        let path = path.as_ref();
        ensure_exists(path)?;
        info!("添加 JSON 类型目录: {}", path.display());
        let provider = JsonCatalogProvider::new(path);
        self.providers.push(Box::new(provider));
        Ok(self)
    }

    /// 添加 TOML 类型目录
    pub fn add_catalog_toml<P: AsRef<Path>>(mut self, path: P) -> CompositionResult<Self> {
        let path = path.as_ref();
        ensure_exists(path)?;
        info!("添加 TOML 类型目录: {}", path.display());
        let provider = TomlCatalogProvider::new(path);
        self.providers.push(Box::new(provider));
        Ok(self)
    }

    /// 添加自定义目录提供者
    pub fn add_catalog_provider<T: CatalogProvider + 'static>(mut self, provider: T) -> Self {
        info!("添加自定义目录提供者: {}", provider.name());
        self.providers.push(Box::new(provider));
        self
    }

    /// 直接加入内存目录
    pub fn add_catalog(mut self, catalog: TypeCatalog) -> CompositionResult<Self> {
        self.catalog.merge(catalog)?;
        Ok(self)
    }

    /// 添加根类型
    pub fn add_root(mut self, root: impl Into<TypeName>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// 设置构建配置（不改变已加入的目录与根类型）
    pub fn with_options(mut self, options: HierarchyOptions) -> Self {
        self.options = options;
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 加载全部目录并注册根类型，不计算闭包
    pub async fn load_hierarchy(self) -> CompositionResult<TypeHierarchy<TypeCatalog>> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.logging_config.init()?;
        }

        info!("开始构建类型层级");
        let mut catalog = self.catalog;
        for provider in &self.providers {
            let descriptors = provider.load().await?;
            debug!(
                provider = provider.name(),
                count = descriptors.len(),
                "目录加载完成"
            );
            catalog.extend(descriptors)?;
        }
        info!(
            types = catalog.len(),
            roots = self.roots.len(),
            "类型目录合并完成"
        );

        let mut hierarchy = TypeHierarchy::with_options(catalog, &self.options);
        hierarchy.register_all(&self.roots)?;
        Ok(hierarchy)
    }

    /// 构建类型层级：加载目录、注册根类型并计算闭包
    pub async fn build(self) -> CompositionResult<ResolvedHierarchy> {
        let mut hierarchy = self.load_hierarchy().await?;
        let rounds = hierarchy.resolve_all_classes()?;
        info!(rounds, "类型层级构建完成");
        Ok(Arc::new(hierarchy))
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_exists(path: &Path) -> CompositionResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        }
        .into())
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 由配置项创建；无法识别的级别返回错误
    pub fn from_options(options: &LoggingOptions) -> CompositionResult<Self> {
        let level = options
            .level
            .parse::<tracing::Level>()
            .map_err(|e| CompositionError::Logging {
                message: format!("无效的日志级别 '{}': {}", options.level, e),
            })?;
        Ok(Self {
            level,
            json_format: options.json,
            ..Self::default()
        })
    }

    /// 初始化全局日志
    ///
    /// `RUST_LOG` 存在时优先使用其过滤规则。重复初始化返回 `Logging` 错误。
    pub fn init(&self) -> CompositionResult<()> {
        let directive: Directive = LevelFilter::from_level(self.level).into();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(directive));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| CompositionError::Logging {
            message: e.to_string(),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
