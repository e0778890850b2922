use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

// 从 lib.rs 导入模块
use rust_lms_next::config::AppConfig;
use rust_lms_next::models::AppStartTime;
use rust_lms_next::routes;
use rust_lms_next::runtime::lifetime;
use rust_lms_next::utils::{json_error_handler, query_error_handler};

/// 按配置构造 CORS，`*` 表示放开来源
fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.cors.max_age);

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.cors.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    let methods: Vec<Method> = config
        .cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    cors = if methods.is_empty() {
        cors.allow_any_method()
    } else {
        cors.allowed_methods(methods)
    };

    if config.cors.allowed_headers.is_empty() {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(config.cors.allowed_headers.iter().map(String::as_str))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    AppConfig::init().map_err(std::io::Error::other)?;
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting pre-startup processing...
        Project: {} ({})
        Version: {}
        Calendar offset: {}",
        env!("CARGO_PKG_NAME"),
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.calendar_offset()
    );

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(std::io::Error::other)?;

    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    // 输出预处理时间
    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );

    // 预处理完成 //

    warn!("Using {} CPU cores for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler)) // 设置查询参数错误处理器
            .app_data(web::JsonConfig::default().error_handler(json_error_handler)) // 设置JSON错误处理器
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::PayloadConfig::new(
                config.server.limits.max_payload_size,
            )) // 设置最大请求体大小
            .configure(routes::configure_auth_routes) // 令牌校验与当前用户
            .configure(routes::configure_user_routes) // 学生、教师档案
            .configure(routes::configure_course_routes) // 课程（含公开目录）
            .configure(routes::configure_enrollment_routes) // 选课
            .configure(routes::configure_payment_routes) // 缴费
            .configure(routes::configure_calendar_routes) // 日历排课
            .configure(routes::configure_attendance_routes) // 考勤审批
            .configure(routes::configure_salary_routes) // 教师工资
            .configure(routes::configure_assignment_routes) // 作业与提交
            .configure(routes::configure_inquiry_routes) // 官网咨询
            .configure(routes::configure_dashboard_routes) // 管理后台统计
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    )) // 启用长连接
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    )) // 客户端超时
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    )) // 断连超时
    .workers(config.server.workers);

    let server = {
        #[cfg(unix)]
        {
            if let Some(socket_path) = config.unix_socket_path() {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path)?;
                }
                server.bind_uds(socket_path)?
            } else {
                let bind_address = config.server_bind_address();
                warn!("Starting server at http://{}", bind_address);
                server.bind(bind_address)?
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
