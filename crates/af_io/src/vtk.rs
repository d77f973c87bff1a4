// crates/af_io/src/vtk.rs

//! VTK legacy structured grid（ASCII）读写
//!
//! 状态文件既是载入源也是检查点输出，布局固定：
//!
//! ```text
//! # vtk DataFile Version 3.1
//! <注释行>
//! ASCII
//! DATASET STRUCTURED_GRID
//! DIMENSIONS imx jmx 1
//! POINTS imx*jmx FLOAT
//! <x y 0.0 ...>                        # i 内层
//! CELL_DATA (imx-1)(jmx-1)
//! VECTORS Velocity FLOAT
//! <u v 0.0 ...>
//! SCALARS Density FLOAT
//! LOOKUP_TABLE default
//! <ρ ...>
//! SCALARS Pressure FLOAT
//! LOOKUP_TABLE default
//! <p ...>
//! [SCALARS <名> FLOAT + LOOKUP_TABLE default + 值]   # 可选附加标量
//! ```
//!
//! 数值用 f64 的最短往返十进制表示写出，读回逐位一致。
//! 检查点写出是原子的：先写 `<name>.part` 再重命名。

use ndarray::Array2;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{IoError, IoResult};

/// 状态文件数据
#[derive(Debug, Clone)]
pub struct StateData {
    /// i 方向顶点数
    pub imx: usize,
    /// j 方向顶点数
    pub jmx: usize,
    /// 单元 x 速度，维度 (imx−1, jmx−1)
    pub u: Array2<f64>,
    /// 单元 y 速度
    pub v: Array2<f64>,
    /// 单元密度
    pub density: Array2<f64>,
    /// 单元压力
    pub pressure: Array2<f64>,
}

/// 写出状态检查点（原子）
///
/// # 参数
/// - `x`, `y`: 顶点坐标，维度 (imx, jmx)
/// - `u`, `v`, `density`, `pressure`: 内部单元分量，维度 (imx−1, jmx−1)
/// - `extra`: 可选附加单元标量（如浸入边界符号距离）
#[allow(clippy::too_many_arguments)]
pub fn write_state(
    path: &Path,
    x: &Array2<f64>,
    y: &Array2<f64>,
    u: &Array2<f64>,
    v: &Array2<f64>,
    density: &Array2<f64>,
    pressure: &Array2<f64>,
    extra: Option<(&str, &Array2<f64>)>,
) -> IoResult<()> {
    let (imx, jmx) = x.dim();
    let part_path = {
        let mut name = path.as_os_str().to_owned();
        name.push(".part");
        std::path::PathBuf::from(name)
    };

    {
        let file = fs::File::create(&part_path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "# vtk DataFile Version 3.1")?;
        writeln!(writer, "cfd-iteration-data")?;
        writeln!(writer, "ASCII")?;
        writeln!(writer, "DATASET STRUCTURED_GRID")?;
        writeln!(writer, "DIMENSIONS {imx} {jmx} 1")?;

        writeln!(writer, "POINTS {} FLOAT", imx * jmx)?;
        for j in 0..jmx {
            for i in 0..imx {
                writeln!(writer, "{} {} 0.0", x[[i, j]], y[[i, j]])?;
            }
        }

        writeln!(writer, "CELL_DATA {}", (imx - 1) * (jmx - 1))?;

        writeln!(writer, "VECTORS Velocity FLOAT")?;
        for j in 0..jmx - 1 {
            for i in 0..imx - 1 {
                writeln!(writer, "{} {} 0.0", u[[i, j]], v[[i, j]])?;
            }
        }

        writeln!(writer, "SCALARS Density FLOAT")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for j in 0..jmx - 1 {
            for i in 0..imx - 1 {
                writeln!(writer, "{}", density[[i, j]])?;
            }
        }

        writeln!(writer, "SCALARS Pressure FLOAT")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for j in 0..jmx - 1 {
            for i in 0..imx - 1 {
                writeln!(writer, "{}", pressure[[i, j]])?;
            }
        }

        if let Some((name, values)) = extra {
            writeln!(writer, "SCALARS {name} FLOAT")?;
            writeln!(writer, "LOOKUP_TABLE default")?;
            for j in 0..jmx - 1 {
                for i in 0..imx - 1 {
                    writeln!(writer, "{}", values[[i, j]])?;
                }
            }
        }

        writer.flush()?;
    }

    fs::rename(&part_path, path)?;
    Ok(())
}

/// Token 游标
struct Cursor<'a> {
    tokens: Vec<&'a str>,
    position: usize,
    file: String,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, file: String) -> Self {
        Self {
            tokens: text.split_whitespace().collect(),
            position: 0,
            file,
        }
    }

    fn next(&mut self) -> IoResult<&'a str> {
        let token = self
            .tokens
            .get(self.position)
            .copied()
            .ok_or_else(|| IoError::format(&self.file, "文件提前结束"))?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, keyword: &str) -> IoResult<()> {
        let token = self.next()?;
        if token != keyword {
            return Err(IoError::format(
                &self.file,
                format!("期望 '{keyword}'，实际 '{token}'"),
            ));
        }
        Ok(())
    }

    fn next_f64(&mut self) -> IoResult<f64> {
        let token = self.next()?;
        token
            .parse::<f64>()
            .map_err(|_| IoError::format(&self.file, format!("数值非法: '{token}'")))
    }

    fn next_usize(&mut self) -> IoResult<usize> {
        let token = self.next()?;
        token
            .parse::<usize>()
            .map_err(|_| IoError::format(&self.file, format!("整数非法: '{token}'")))
    }
}

/// 载入状态文件
///
/// 只读取核心消费的字段（维度、速度、密度、压力），附加标量跳过。
pub fn load_state(path: &Path) -> IoResult<StateData> {
    let file = path.display().to_string();
    let text = fs::read_to_string(path)?;

    // 头两行（版本行与注释行）整行跳过
    let mut lines = text.lines();
    let _header = lines
        .next()
        .ok_or_else(|| IoError::format(&file, "空文件"))?;
    let _comment = lines
        .next()
        .ok_or_else(|| IoError::format(&file, "缺少注释行"))?;
    let body = lines.collect::<Vec<_>>().join("\n");

    let mut cursor = Cursor::new(&body, file.clone());
    cursor.expect("ASCII")?;
    cursor.expect("DATASET")?;
    cursor.expect("STRUCTURED_GRID")?;

    cursor.expect("DIMENSIONS")?;
    let imx = cursor.next_usize()?;
    let jmx = cursor.next_usize()?;
    let _k = cursor.next_usize()?;
    if imx < 2 || jmx < 2 {
        return Err(IoError::format(&file, format!("维度过小: {imx} x {jmx}")));
    }

    cursor.expect("POINTS")?;
    let n_points = cursor.next_usize()?;
    cursor.expect("FLOAT")?;
    if n_points != imx * jmx {
        return Err(IoError::Dimension {
            file,
            expected: imx * jmx,
            found: n_points,
        });
    }
    // 顶点坐标由网格文件权威提供，这里只跳过
    for _ in 0..n_points * 3 {
        cursor.next_f64()?;
    }

    cursor.expect("CELL_DATA")?;
    let n_cells = cursor.next_usize()?;
    if n_cells != (imx - 1) * (jmx - 1) {
        return Err(IoError::Dimension {
            file,
            expected: (imx - 1) * (jmx - 1),
            found: n_cells,
        });
    }

    cursor.expect("VECTORS")?;
    cursor.expect("Velocity")?;
    cursor.expect("FLOAT")?;
    let mut u = Array2::zeros((imx - 1, jmx - 1));
    let mut v = Array2::zeros((imx - 1, jmx - 1));
    for j in 0..jmx - 1 {
        for i in 0..imx - 1 {
            u[[i, j]] = cursor.next_f64()?;
            v[[i, j]] = cursor.next_f64()?;
            let _w = cursor.next_f64()?;
        }
    }

    let density = read_scalars(&mut cursor, "Density", imx, jmx)?;
    let pressure = read_scalars(&mut cursor, "Pressure", imx, jmx)?;

    Ok(StateData {
        imx,
        jmx,
        u,
        v,
        density,
        pressure,
    })
}

fn read_scalars(
    cursor: &mut Cursor<'_>,
    name: &str,
    imx: usize,
    jmx: usize,
) -> IoResult<Array2<f64>> {
    cursor.expect("SCALARS")?;
    cursor.expect(name)?;
    cursor.expect("FLOAT")?;
    cursor.expect("LOOKUP_TABLE")?;
    cursor.expect("default")?;

    let mut values = Array2::zeros((imx - 1, jmx - 1));
    for j in 0..jmx - 1 {
        for i in 0..imx - 1 {
            values[[i, j]] = cursor.next_f64()?;
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_arrays(imx: usize, jmx: usize) -> [Array2<f64>; 6] {
        let x = Array2::from_shape_fn((imx, jmx), |(i, _)| i as f64 * 0.1);
        let y = Array2::from_shape_fn((imx, jmx), |(_, j)| j as f64 * 0.1);
        let cell = |offset: f64| {
            Array2::from_shape_fn((imx - 1, jmx - 1), |(i, j)| {
                offset + (i as f64) * 0.37 + (j as f64) * 1.91
            })
        };
        [x, y, cell(100.0), cell(-3.0), cell(1.2), cell(101325.0)]
    }

    /// S6 / 性质 7: 检查点往返逐位一致
    #[test]
    fn test_checkpoint_round_trip_bitwise() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        let [x, y, u, v, density, pressure] = sample_arrays(5, 4);

        write_state(&path, &x, &y, &u, &v, &density, &pressure, None).unwrap();
        let loaded = load_state(&path).unwrap();

        assert_eq!(loaded.imx, 5);
        assert_eq!(loaded.jmx, 4);
        assert_eq!(loaded.u, u);
        assert_eq!(loaded.v, v);
        assert_eq!(loaded.density, density);
        assert_eq!(loaded.pressure, pressure);
    }

    #[test]
    fn test_irrational_values_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        let [x, y, mut u, v, density, pressure] = sample_arrays(3, 3);
        u[[0, 0]] = std::f64::consts::PI * 1e5;
        u[[1, 1]] = f64::MIN_POSITIVE;

        write_state(&path, &x, &y, &u, &v, &density, &pressure, None).unwrap();
        let loaded = load_state(&path).unwrap();
        // 最短往返表示：逐位一致
        assert_eq!(loaded.u[[0, 0]].to_bits(), u[[0, 0]].to_bits());
        assert_eq!(loaded.u[[1, 1]].to_bits(), u[[1, 1]].to_bits());
    }

    #[test]
    fn test_extra_scalar_written_and_skipped_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        let [x, y, u, v, density, pressure] = sample_arrays(4, 4);
        let distance = Array2::from_elem((3, 3), -0.5);

        write_state(
            &path,
            &x,
            &y,
            &u,
            &v,
            &density,
            &pressure,
            Some(("IBDistance", &distance)),
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("SCALARS IBDistance FLOAT"));

        // 载入仍然成功（附加标量不被消费）
        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded.pressure, pressure);
    }

    #[test]
    fn test_atomic_write_leaves_no_part_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        let [x, y, u, v, density, pressure] = sample_arrays(3, 3);
        write_state(&path, &x, &y, &u, &v, &density, &pressure, None).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("state.vtk.part").exists());
    }

    #[test]
    fn test_layout_matches_contract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        let [x, y, u, v, density, pressure] = sample_arrays(3, 3);
        write_state(&path, &x, &y, &u, &v, &density, &pressure, None).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# vtk DataFile Version 3.1");
        assert_eq!(lines[2], "ASCII");
        assert_eq!(lines[3], "DATASET STRUCTURED_GRID");
        assert_eq!(lines[4], "DIMENSIONS 3 3 1");
        assert_eq!(lines[5], "POINTS 9 FLOAT");
        assert!(text.contains("CELL_DATA 4"));
        assert!(text.contains("VECTORS Velocity FLOAT"));
        assert!(text.contains("SCALARS Density FLOAT"));
        assert!(text.contains("SCALARS Pressure FLOAT"));
    }

    #[test]
    fn test_truncated_state_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        std::fs::write(
            &path,
            "# vtk DataFile Version 3.1\ncomment\nASCII\nDATASET STRUCTURED_GRID\nDIMENSIONS 3 3 1\n",
        )
        .unwrap();
        assert!(load_state(&path).is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.vtk");
        std::fs::write(
            &path,
            "# vtk DataFile Version 3.1\nc\nASCII\nDATASET STRUCTURED_GRID\nDIMENSIONS 3 3 1\nPOINTS 4 FLOAT\n",
        )
        .unwrap();
        assert!(matches!(
            load_state(&path),
            Err(IoError::Dimension { .. })
        ));
    }
}
