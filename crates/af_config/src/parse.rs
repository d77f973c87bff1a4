// crates/af_config/src/parse.rs

//! 固定顺序控制文件解析器
//!
//! 控制文件为纯文本，每个非空、非 `#` 行是一条指令，顺序固定：
//!
//! ```text
//! scheme_name                       van_leer | ldfss0
//! interpolant                       none | muscl
//! CFL                               正实数
//! time_stepping_method [dt]         l | g，g 可携带全局时间步长
//! time_step_accuracy                none | RK4
//! tolerance                         正实数
//! grid_file                         路径
//! IB_file                           路径或 ~（禁用）
//! state_load_file                   路径或 ~（自由流初始化）
//! max_iters                         正整数
//! checkpoint_iter                   非负整数（0 = 从不写出）
//! debug_level                       非负整数
//! gamma  R  rho_inf  u_inf  v_inf  p_inf  mu_ref  T_ref  Suth_temp  Pr
//!                                   各占一行
//! ```
//!
//! `~` 为缺省哨兵。未知的枚举值是致命配置错误。

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::solver_config::SolverConfig;
use crate::types::{InterpolantKind, SchemeKind, TimeAccuracy, TimeStepping};

/// 缺省哨兵
const ABSENT: &str = "~";

/// 从文件解析求解器配置
pub fn parse_control_file(path: &Path) -> Result<SolverConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse_control_text(&text)
}

/// 从文本解析求解器配置
pub fn parse_control_text(text: &str) -> Result<SolverConfig, ConfigError> {
    let mut directives = Directives::new(text);

    let scheme = SchemeKind::from_str(directives.next("scheme_name")?)?;
    let interpolant = InterpolantKind::from_str(directives.next("interpolant")?)?;
    let cfl = parse_f64("CFL", directives.next("CFL")?)?;
    let time_stepping = parse_time_stepping(directives.next("time_stepping_method")?)?;
    let time_accuracy = TimeAccuracy::from_str(directives.next("time_step_accuracy")?)?;
    let tolerance = parse_f64("tolerance", directives.next("tolerance")?)?;
    let grid_file = PathBuf::from(directives.next("grid_file")?);
    let ib_file = parse_optional_path(directives.next("IB_file")?);
    let state_load_file = parse_optional_path(directives.next("state_load_file")?);
    let max_iters = parse_u64("max_iters", directives.next("max_iters")?)?;
    let checkpoint_iter = parse_u64("checkpoint_iter", directives.next("checkpoint_iter")?)?;
    let debug_level = parse_u64("debug_level", directives.next("debug_level")?)? as u8;

    let mut config = SolverConfig {
        scheme,
        interpolant,
        cfl,
        time_stepping,
        time_accuracy,
        tolerance,
        grid_file,
        ib_file,
        state_load_file,
        max_iters,
        checkpoint_iter,
        debug_level,
        ..SolverConfig::default()
    };

    config.gas.gamma = parse_f64("gamma", directives.next("gamma")?)?;
    config.gas.r_gas = parse_f64("R", directives.next("R")?)?;
    config.free_stream.density = parse_f64("density_inf", directives.next("density_inf")?)?;
    config.free_stream.x_speed = parse_f64("x_speed_inf", directives.next("x_speed_inf")?)?;
    config.free_stream.y_speed = parse_f64("y_speed_inf", directives.next("y_speed_inf")?)?;
    config.free_stream.pressure = parse_f64("pressure_inf", directives.next("pressure_inf")?)?;
    config.gas.mu_ref = parse_f64("mu_ref", directives.next("mu_ref")?)?;
    config.gas.t_ref = parse_f64("T_ref", directives.next("T_ref")?)?;
    config.gas.sutherland_temp =
        parse_f64("Sutherland_temp", directives.next("Sutherland_temp")?)?;
    config.gas.prandtl = parse_f64("Pr", directives.next("Pr")?)?;

    config.validate()?;
    Ok(config)
}

/// 指令行迭代器
///
/// 跳过空行与 `#` 注释行，记录序号用于错误报告。
struct Directives<'a> {
    lines: std::str::Lines<'a>,
    position: usize,
}

impl<'a> Directives<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            position: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, ConfigError> {
        self.position += 1;
        for line in self.lines.by_ref() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(trimmed);
        }
        Err(ConfigError::MissingDirective {
            position: self.position,
            expected,
        })
    }
}

fn parse_f64(directive: &'static str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::ParseNumber {
        directive,
        value: value.to_string(),
    })
}

fn parse_u64(directive: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::ParseNumber {
        directive,
        value: value.to_string(),
    })
}

fn parse_optional_path(value: &str) -> Option<PathBuf> {
    if value == ABSENT {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// 解析时间步进指令
///
/// `l` 为局部步长；`g` 为全局步长，可在同一行携带覆盖值，
/// 缺省记为 0（求解器侧回退为局部最小值广播）。
fn parse_time_stepping(value: &str) -> Result<TimeStepping, ConfigError> {
    let mut tokens = value.split_whitespace();
    let method = tokens.next().unwrap_or_default();
    match method {
        "l" => Ok(TimeStepping::Local),
        "g" => {
            let dt = match tokens.next() {
                Some(text) => parse_f64("global_time_step", text)?,
                None => 0.0,
            };
            Ok(TimeStepping::Global(dt))
        }
        other => Err(ConfigError::UnknownEnum {
            directive: "time_stepping_method",
            value: other.to_string(),
        }),
    }
}
