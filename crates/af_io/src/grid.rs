// crates/af_io/src/grid.rs

//! 网格与距离场读入
//!
//! # 网格文件格式
//!
//! ```text
//! imx jmx
//! x(0,0) y(0,0)  x(1,0) y(1,0) ...       # j 外层、i 内层的顶点坐标对
//! ```
//!
//! 坐标对按 j 外层排列，与 VTK POINTS 的排序一致，两种外部格式
//! 因此互相对得上。空行与 `#` 行跳过。
//!
//! # 距离场文件格式
//!
//! 同样的维度头（顶点数），之后每内部单元一个符号距离
//! （(imx−1)(jmx−1) 个，j 外层），负值在固体内。

use ndarray::Array2;
use std::fs;
use std::path::Path;

use crate::error::{IoError, IoResult};

/// 网格数据
#[derive(Debug, Clone)]
pub struct GridData {
    /// i 方向顶点数
    pub imx: usize,
    /// j 方向顶点数
    pub jmx: usize,
    /// 顶点 x 坐标，维度 (imx, jmx)
    pub x: Array2<f64>,
    /// 顶点 y 坐标，维度 (imx, jmx)
    pub y: Array2<f64>,
}

/// 文件名辅助
fn file_name(path: &Path) -> String {
    path.display().to_string()
}

/// 读取有效 token（跳过空行与注释行）
fn tokens(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .collect()
}

fn parse_dims(tokens: &[&str], file: &str) -> IoResult<(usize, usize)> {
    if tokens.len() < 2 {
        return Err(IoError::format(file, "缺少维度头"));
    }
    let imx = tokens[0]
        .parse::<usize>()
        .map_err(|_| IoError::format(file, format!("imx 非法: '{}'", tokens[0])))?;
    let jmx = tokens[1]
        .parse::<usize>()
        .map_err(|_| IoError::format(file, format!("jmx 非法: '{}'", tokens[1])))?;
    if imx < 2 || jmx < 2 {
        return Err(IoError::format(file, format!("维度过小: {imx} x {jmx}")));
    }
    Ok((imx, jmx))
}

fn parse_f64(token: &str, file: &str) -> IoResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| IoError::format(file, format!("数值非法: '{token}'")))
}

/// 读取网格文件
pub fn read_grid(path: &Path) -> IoResult<GridData> {
    let file = file_name(path);
    let text = fs::read_to_string(path)?;
    let tokens = tokens(&text);

    let (imx, jmx) = parse_dims(&tokens, &file)?;
    let expected = 2 + 2 * imx * jmx;
    if tokens.len() != expected {
        return Err(IoError::Dimension {
            file,
            expected,
            found: tokens.len(),
        });
    }

    let mut x = Array2::zeros((imx, jmx));
    let mut y = Array2::zeros((imx, jmx));
    let mut cursor = 2;
    for j in 0..jmx {
        for i in 0..imx {
            x[[i, j]] = parse_f64(tokens[cursor], &file)?;
            y[[i, j]] = parse_f64(tokens[cursor + 1], &file)?;
            cursor += 2;
        }
    }

    Ok(GridData { imx, jmx, x, y })
}

/// 写出网格文件（算例生成与测试用）
pub fn write_grid(path: &Path, grid: &GridData) -> IoResult<()> {
    use std::fmt::Write as _;
    let mut text = String::new();
    let _ = writeln!(text, "{} {}", grid.imx, grid.jmx);
    for j in 0..grid.jmx {
        for i in 0..grid.imx {
            let _ = writeln!(text, "{} {}", grid.x[[i, j]], grid.y[[i, j]]);
        }
    }
    fs::write(path, text)?;
    Ok(())
}

/// 读取浸入边界符号距离场
///
/// 返回维度 (imx−1, jmx−1) 的内部单元距离数组。
pub fn read_distance_field(path: &Path) -> IoResult<Array2<f64>> {
    let file = file_name(path);
    let text = fs::read_to_string(path)?;
    let tokens = tokens(&text);

    let (imx, jmx) = parse_dims(&tokens, &file)?;
    let cells = (imx - 1) * (jmx - 1);
    let expected = 2 + cells;
    if tokens.len() != expected {
        return Err(IoError::Dimension {
            file,
            expected,
            found: tokens.len(),
        });
    }

    let mut distance = Array2::zeros((imx - 1, jmx - 1));
    let mut cursor = 2;
    for j in 0..jmx - 1 {
        for i in 0..imx - 1 {
            distance[[i, j]] = parse_f64(tokens[cursor], &file)?;
            cursor += 1;
        }
    }
    Ok(distance)
}
