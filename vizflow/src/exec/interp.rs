//! Tree-walking evaluator for the transform script language.

use super::ast::{Arg, BinOp, Expr, Stmt, UnaryOp};
use super::parser::parse;
use super::plot::{write_chart, ChartKind, ChartSpec};
use super::ScriptError;
use crate::context::Value;
use crate::dataset::{Frame, Scalar};
use std::path::PathBuf;

/// One executed statement, recorded for failure diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    /// 1-based source line (including the sandbox preamble line).
    pub line: u32,
    /// Trimmed statement text.
    pub text: String,
}

/// Where chart builtins are allowed to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderTarget {
    /// Default: charts refuse to render (there is no display attached).
    Display,
    /// Charts write files to disk.
    File,
}

/// Script interpreter over an ordered variable namespace.
///
/// The namespace starts as a copy of the context store's bindings and is
/// harvested back wholesale after a successful run; the interpreter never
/// touches the store itself.
#[derive(Debug)]
pub struct Interpreter {
    env: Vec<(String, Value)>,
    render_target: RenderTarget,
    trace: Vec<TraceEntry>,
    files_written: Vec<PathBuf>,
}

impl Interpreter {
    /// Creates an interpreter whose namespace is `bindings`.
    #[must_use]
    pub fn with_bindings(bindings: Vec<(String, Value)>) -> Self {
        Self {
            env: bindings,
            render_target: RenderTarget::Display,
            trace: Vec::new(),
            files_written: Vec::new(),
        }
    }

    /// Executes `source` statement by statement, recording a trace.
    ///
    /// # Errors
    ///
    /// Returns the first lex, parse, or runtime error; the namespace keeps
    /// whatever mutations completed statements performed before the error.
    pub fn run(&mut self, source: &str) -> Result<(), ScriptError> {
        let statements = parse(source)?;
        let lines: Vec<&str> = source.lines().collect();

        for statement in &statements {
            let line = statement.line();
            let text = lines
                .get(line as usize - 1)
                .map(|l| l.trim().to_string())
                .unwrap_or_default();
            self.trace.push(TraceEntry { line, text });
            self.exec_statement(statement)
                .map_err(|e| e.with_line(line))?;
        }
        Ok(())
    }

    /// Statements executed so far, failing statement last.
    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Chart files written during execution.
    #[must_use]
    pub fn files_written(&self) -> &[PathBuf] {
        &self.files_written
    }

    /// Consumes the interpreter, returning the final namespace.
    #[must_use]
    pub fn into_bindings(self) -> Vec<(String, Value)> {
        self.env
    }

    fn exec_statement(&mut self, statement: &Stmt) -> Result<(), ScriptError> {
        match statement {
            Stmt::Assign { name, expr, .. } => {
                let value = self.eval(expr, None)?;
                self.bind(name, value);
                Ok(())
            }
            Stmt::Expr { expr, .. } => {
                self.eval(expr, None)?;
                Ok(())
            }
        }
    }

    fn bind(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.env.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.env.push((name.to_string(), value));
        }
    }

    fn lookup(&self, name: &str, row: Option<&RowScope<'_>>) -> Result<Value, ScriptError> {
        if let Some(row) = row {
            if let Some(cell) = row.get(name) {
                return Ok(Value::Scalar(cell));
            }
        }
        self.env
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| ScriptError::msg(format!("undefined name: {name}")))
    }

    fn eval(&mut self, expr: &Expr, row: Option<&RowScope<'_>>) -> Result<Value, ScriptError> {
        match expr {
            Expr::Literal(scalar) => Ok(Value::Scalar(scalar.clone())),
            Expr::Ident(name) => self.lookup(name, row),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|e| self.eval(e, row))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            Expr::Record(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (key, value_expr) in fields {
                    out.push((key.clone(), self.eval(value_expr, row)?));
                }
                Ok(Value::Record(out))
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, row)?;
                eval_unary(*op, &value)
            }
            Expr::Binary { op, lhs, rhs } => {
                if matches!(op, BinOp::And | BinOp::Or) {
                    return self.eval_logical(*op, lhs, rhs, row);
                }
                let lhs = self.eval(lhs, row)?;
                let rhs = self.eval(rhs, row)?;
                eval_binary(*op, &lhs, &rhs)
            }
            Expr::Call { name, args } => self.call_builtin(name, args, row),
            Expr::Method { recv, name, args } => {
                let receiver = self.eval(recv, row)?;
                self.call_method(&receiver, name, args, row)
            }
        }
    }

    fn eval_logical(
        &mut self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        row: Option<&RowScope<'_>>,
    ) -> Result<Value, ScriptError> {
        let lhs = expect_bool(&self.eval(lhs, row)?, op)?;
        match (op, lhs) {
            (BinOp::And, false) => Ok(Value::from(false)),
            (BinOp::Or, true) => Ok(Value::from(true)),
            _ => {
                let rhs = expect_bool(&self.eval(rhs, row)?, op)?;
                Ok(Value::from(rhs))
            }
        }
    }

    // ------------------------------------------------------------------
    // Builtins
    // ------------------------------------------------------------------

    fn call_builtin(
        &mut self,
        name: &str,
        args: &[Arg],
        row: Option<&RowScope<'_>>,
    ) -> Result<Value, ScriptError> {
        match name {
            "set_render_target" => {
                let [mode] = self.eval_positional::<1>(name, args, row)?;
                match string_arg(&mode, name, "mode")?.as_str() {
                    "file" => self.render_target = RenderTarget::File,
                    "display" => self.render_target = RenderTarget::Display,
                    other => {
                        return Err(ScriptError::msg(format!(
                            "unknown render target {other:?} (expected \"file\" or \"display\")"
                        )))
                    }
                }
                Ok(Value::Scalar(Scalar::Null))
            }
            "create_dir" => {
                let [path] = self.eval_positional::<1>(name, args, row)?;
                let path = string_arg(&path, name, "path")?;
                std::fs::create_dir_all(&path)
                    .map_err(|e| ScriptError::msg(format!("create_dir({path:?}) failed: {e}")))?;
                Ok(Value::Scalar(Scalar::Null))
            }
            "bar_chart" => self.chart(ChartKind::Bar, name, args, row),
            "line_chart" => self.chart(ChartKind::Line, name, args, row),
            "scatter_plot" => self.chart(ChartKind::Scatter, name, args, row),
            "histogram" => self.histogram(args, row),
            "len" => {
                let [value] = self.eval_positional::<1>(name, args, row)?;
                let len = match &value {
                    Value::Frame(f) => f.n_rows(),
                    Value::List(items) => items.len(),
                    Value::Record(fields) => fields.len(),
                    Value::Scalar(Scalar::Str(s)) => s.chars().count(),
                    other => {
                        return Err(ScriptError::msg(format!(
                            "len() does not apply to {}",
                            other.type_name()
                        )))
                    }
                };
                Ok(Value::from(len as i64))
            }
            "columns" => {
                let [value] = self.eval_positional::<1>(name, args, row)?;
                let frame = frame_arg(&value, name)?;
                Ok(Value::List(
                    frame.columns().iter().map(|c| Value::from(c.as_str())).collect(),
                ))
            }
            other => Err(ScriptError::msg(format!("unknown function: {other}"))),
        }
    }

    fn eval_positional<const N: usize>(
        &mut self,
        name: &str,
        args: &[Arg],
        row: Option<&RowScope<'_>>,
    ) -> Result<[Value; N], ScriptError> {
        if args.len() != N || args.iter().any(|a| a.name.is_some()) {
            return Err(ScriptError::msg(format!(
                "{name}() expects {N} positional argument(s), got {}",
                args.len()
            )));
        }
        let mut values = Vec::with_capacity(N);
        for arg in args {
            values.push(self.eval(&arg.expr, row)?);
        }
        values
            .try_into()
            .map_err(|_| ScriptError::msg(format!("{name}(): bad arguments")))
    }

    fn ensure_file_target(&self, name: &str) -> Result<(), ScriptError> {
        if self.render_target == RenderTarget::File {
            Ok(())
        } else {
            Err(ScriptError::msg(format!(
                "{name}(): no display attached; call set_render_target(\"file\") first"
            )))
        }
    }

    fn chart(
        &mut self,
        kind: ChartKind,
        name: &str,
        args: &[Arg],
        row: Option<&RowScope<'_>>,
    ) -> Result<Value, ScriptError> {
        self.ensure_file_target(name)?;
        let [frame, x, y, path] = self.eval_positional::<4>(name, args, row)?;
        let frame = frame_arg(&frame, name)?;
        let x = string_arg(&x, name, "x column")?;
        let y = string_arg(&y, name, "y column")?;
        let path = string_arg(&path, name, "path")?;

        let labels = frame.column_values(&x).map_err(ScriptError::from_frame)?;
        let values = frame.column_values(&y).map_err(ScriptError::from_frame)?;
        let points = labels
            .iter()
            .zip(&values)
            .filter_map(|(label, value)| value.as_f64().map(|v| (label.to_string(), v)))
            .collect::<Vec<_>>();
        if points.is_empty() && frame.n_rows() > 0 {
            return Err(ScriptError::msg(format!(
                "{name}(): column {y:?} has no numeric values"
            )));
        }

        let spec = ChartSpec {
            kind,
            x_label: x,
            y_label: y,
            points,
        };
        let path = PathBuf::from(path);
        write_chart(&spec, &path).map_err(|e| {
            ScriptError::msg(format!("failed to write chart {}: {e}", path.display()))
        })?;
        self.files_written.push(path);
        Ok(Value::Scalar(Scalar::Null))
    }

    fn histogram(&mut self, args: &[Arg], row: Option<&RowScope<'_>>) -> Result<Value, ScriptError> {
        let name = "histogram";
        self.ensure_file_target(name)?;
        let [frame, column, bins, path] = self.eval_positional::<4>(name, args, row)?;
        let frame = frame_arg(&frame, name)?;
        let column = string_arg(&column, name, "column")?;
        let path = string_arg(&path, name, "path")?;
        let bins = match bins.as_scalar() {
            Some(Scalar::Int(n)) if *n > 0 => *n as usize,
            _ => return Err(ScriptError::msg("histogram(): bins must be a positive int")),
        };

        let values: Vec<f64> = frame
            .column_values(&column)
            .map_err(ScriptError::from_frame)?
            .iter()
            .filter_map(Scalar::as_f64)
            .collect();
        if values.is_empty() {
            return Err(ScriptError::msg(format!(
                "histogram(): column {column:?} has no numeric values"
            )));
        }

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = if (hi - lo).abs() < f64::EPSILON {
            1.0
        } else {
            (hi - lo) / bins as f64
        };
        let mut counts = vec![0usize; bins];
        for v in &values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        let points = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let start = lo + width * i as f64;
                (format!("{start:.3}"), count as f64)
            })
            .collect();

        let spec = ChartSpec {
            kind: ChartKind::Bar,
            x_label: column,
            y_label: "count".to_string(),
            points,
        };
        let path = PathBuf::from(path);
        write_chart(&spec, &path).map_err(|e| {
            ScriptError::msg(format!("failed to write chart {}: {e}", path.display()))
        })?;
        self.files_written.push(path);
        Ok(Value::Scalar(Scalar::Null))
    }

    // ------------------------------------------------------------------
    // Frame methods
    // ------------------------------------------------------------------

    fn call_method(
        &mut self,
        receiver: &Value,
        name: &str,
        args: &[Arg],
        row: Option<&RowScope<'_>>,
    ) -> Result<Value, ScriptError> {
        let Value::Frame(frame) = receiver else {
            return Err(ScriptError::msg(format!(
                "type {} has no method {name:?}",
                receiver.type_name()
            )));
        };

        match name {
            "head" => {
                let [n] = self.eval_positional::<1>(name, args, row)?;
                let n = match n.as_scalar() {
                    Some(Scalar::Int(n)) if *n >= 0 => *n as usize,
                    _ => return Err(ScriptError::msg("head(): expected a non-negative int")),
                };
                Ok(Value::Frame(frame.head(n)))
            }
            "count" => {
                if !args.is_empty() {
                    return Err(ScriptError::msg("count() takes no arguments"));
                }
                Ok(Value::from(frame.n_rows() as i64))
            }
            "mean" | "sum" | "min" | "max" => {
                let [column] = self.eval_positional::<1>(name, args, row)?;
                let column = string_arg(&column, name, "column")?;
                aggregate(frame, name, &column)
            }
            "drop_nulls" => match args.len() {
                0 => Ok(Value::Frame(
                    frame.drop_nulls(None).map_err(ScriptError::from_frame)?,
                )),
                1 => {
                    let [column] = self.eval_positional::<1>(name, args, row)?;
                    let column = string_arg(&column, name, "column")?;
                    Ok(Value::Frame(
                        frame
                            .drop_nulls(Some(&column))
                            .map_err(ScriptError::from_frame)?,
                    ))
                }
                n => Err(ScriptError::msg(format!(
                    "drop_nulls() takes 0 or 1 arguments, got {n}"
                ))),
            },
            "select" => {
                if args.is_empty() {
                    return Err(ScriptError::msg("select() needs at least one column"));
                }
                let mut names = Vec::with_capacity(args.len());
                for arg in args {
                    let value = self.eval(&arg.expr, row)?;
                    names.push(string_arg(&value, name, "column")?);
                }
                Ok(Value::Frame(
                    frame.select(&names).map_err(ScriptError::from_frame)?,
                ))
            }
            "sort_by" => {
                let (column, descending) = match args.len() {
                    1 => {
                        let [column] = self.eval_positional::<1>(name, args, row)?;
                        (string_arg(&column, name, "column")?, false)
                    }
                    2 => {
                        let [column, desc] = self.eval_positional::<2>(name, args, row)?;
                        let descending = match desc.as_scalar() {
                            Some(Scalar::Bool(b)) => *b,
                            _ => {
                                return Err(ScriptError::msg(
                                    "sort_by(): second argument must be a bool",
                                ))
                            }
                        };
                        (string_arg(&column, name, "column")?, descending)
                    }
                    n => {
                        return Err(ScriptError::msg(format!(
                            "sort_by() takes 1 or 2 arguments, got {n}"
                        )))
                    }
                };
                Ok(Value::Frame(
                    frame
                        .sort_by(&column, descending)
                        .map_err(ScriptError::from_frame)?,
                ))
            }
            "filter" => {
                let [predicate] = lazy_args::<1>(name, args)?;
                let mut mask = Vec::with_capacity(frame.n_rows());
                for row_cells in frame.rows() {
                    let scope = RowScope::new(frame, row_cells);
                    let value = self.eval(predicate, Some(&scope))?;
                    mask.push(expect_bool(&value, BinOp::And).map_err(|_| {
                        ScriptError::msg("filter(): predicate must produce a bool per row")
                    })?);
                }
                Ok(Value::Frame(frame.retain_rows(&mask)))
            }
            "assign" => {
                if args.is_empty() || args.iter().any(|a| a.name.is_none()) {
                    return Err(ScriptError::msg(
                        "assign() takes keyword arguments, e.g. assign(total = price * qty)",
                    ));
                }
                let mut out = frame.clone();
                for arg in args {
                    let column = arg.name.clone().unwrap_or_default();
                    let mut cells = Vec::with_capacity(out.n_rows());
                    for row_cells in out.rows() {
                        let scope = RowScope::new(&out, row_cells);
                        let value = self.eval(&arg.expr, Some(&scope))?;
                        match value {
                            Value::Scalar(s) => cells.push(s),
                            other => {
                                return Err(ScriptError::msg(format!(
                                    "assign({column} = ...): row expression must produce a scalar, got {}",
                                    other.type_name()
                                )))
                            }
                        }
                    }
                    out = out.with_column(&column, cells);
                }
                Ok(Value::Frame(out))
            }
            other => Err(ScriptError::msg(format!("unknown frame method: {other}"))),
        }
    }
}

/// Column bindings for one row during `filter`/`assign` evaluation.
struct RowScope<'a> {
    frame: &'a Frame,
    cells: &'a [Scalar],
}

impl<'a> RowScope<'a> {
    const fn new(frame: &'a Frame, cells: &'a [Scalar]) -> Self {
        Self { frame, cells }
    }

    fn get(&self, name: &str) -> Option<Scalar> {
        self.frame
            .column_index(name)
            .map(|idx| self.cells[idx].clone())
    }
}

fn lazy_args<'a, const N: usize>(name: &str, args: &'a [Arg]) -> Result<[&'a Expr; N], ScriptError> {
    if args.len() != N || args.iter().any(|a| a.name.is_some()) {
        return Err(ScriptError::msg(format!(
            "{name}() expects {N} positional argument(s), got {}",
            args.len()
        )));
    }
    let exprs: Vec<&Expr> = args.iter().map(|a| &a.expr).collect();
    exprs
        .try_into()
        .map_err(|_| ScriptError::msg(format!("{name}(): bad arguments")))
}

fn string_arg(value: &Value, func: &str, what: &str) -> Result<String, ScriptError> {
    match value.as_scalar() {
        Some(Scalar::Str(s)) => Ok(s.clone()),
        _ => Err(ScriptError::msg(format!(
            "{func}(): {what} must be a string, got {}",
            value.type_name()
        ))),
    }
}

fn frame_arg<'a>(value: &'a Value, func: &str) -> Result<&'a Frame, ScriptError> {
    value.as_frame().ok_or_else(|| {
        ScriptError::msg(format!(
            "{func}(): expected a frame, got {}",
            value.type_name()
        ))
    })
}

fn expect_bool(value: &Value, op: BinOp) -> Result<bool, ScriptError> {
    match value.as_scalar() {
        Some(Scalar::Bool(b)) => Ok(*b),
        _ => Err(ScriptError::msg(format!(
            "operator {:?} needs bool operands, got {}",
            op.symbol(),
            value.type_name()
        ))),
    }
}

fn aggregate(frame: &Frame, name: &str, column: &str) -> Result<Value, ScriptError> {
    let values = frame
        .column_values(column)
        .map_err(ScriptError::from_frame)?;

    match name {
        "mean" => {
            let numeric: Vec<f64> = values.iter().filter_map(Scalar::as_f64).collect();
            if numeric.is_empty() {
                return Ok(Value::Scalar(Scalar::Null));
            }
            Ok(Value::from(numeric.iter().sum::<f64>() / numeric.len() as f64))
        }
        "sum" => {
            let numeric: Vec<&Scalar> = values
                .iter()
                .filter(|s| s.as_f64().is_some())
                .collect();
            if numeric.iter().all(|s| matches!(s, Scalar::Int(_))) {
                let total: i64 = numeric
                    .iter()
                    .map(|s| if let Scalar::Int(i) = s { *i } else { 0 })
                    .sum();
                Ok(Value::from(total))
            } else {
                let total: f64 = numeric.iter().filter_map(|s| s.as_f64()).sum();
                Ok(Value::from(total))
            }
        }
        "min" | "max" => {
            let mut best: Option<&Scalar> = None;
            for value in &values {
                if value.is_null() {
                    continue;
                }
                best = Some(match best {
                    None => value,
                    Some(current) => {
                        let ord = value.compare(current);
                        let take = if name == "min" {
                            ord == std::cmp::Ordering::Less
                        } else {
                            ord == std::cmp::Ordering::Greater
                        };
                        if take { value } else { current }
                    }
                });
            }
            Ok(Value::Scalar(best.cloned().unwrap_or(Scalar::Null)))
        }
        _ => Err(ScriptError::msg(format!("unknown aggregate: {name}"))),
    }
}

fn eval_unary(op: UnaryOp, value: &Value) -> Result<Value, ScriptError> {
    match op {
        UnaryOp::Neg => match value.as_scalar() {
            Some(Scalar::Int(i)) => Ok(Value::from(-i)),
            Some(Scalar::Float(f)) => Ok(Value::from(-f)),
            _ => Err(ScriptError::msg(format!(
                "unary '-' needs a number, got {}",
                value.type_name()
            ))),
        },
        UnaryOp::Not => match value.as_scalar() {
            Some(Scalar::Bool(b)) => Ok(Value::from(!b)),
            _ => Err(ScriptError::msg(format!(
                "'not' needs a bool, got {}",
                value.type_name()
            ))),
        },
    }
}

fn eval_binary(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, ScriptError> {
    use std::cmp::Ordering;

    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => {
            arithmetic(op, lhs, rhs)
        }
        BinOp::Eq => Ok(Value::from(values_equal(lhs, rhs))),
        BinOp::NotEq => Ok(Value::from(!values_equal(lhs, rhs))),
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
            let (Some(a), Some(b)) = (lhs.as_scalar(), rhs.as_scalar()) else {
                return Err(ScriptError::msg(format!(
                    "operator {:?} needs scalar operands",
                    op.symbol()
                )));
            };
            let ord = a.compare(b);
            let result = match op {
                BinOp::Lt => ord == Ordering::Less,
                BinOp::LtEq => ord != Ordering::Greater,
                BinOp::Gt => ord == Ordering::Greater,
                BinOp::GtEq => ord != Ordering::Less,
                _ => unreachable!(),
            };
            Ok(Value::from(result))
        }
        BinOp::And | BinOp::Or => {
            // Handled with short-circuiting in the evaluator.
            let a = expect_bool(lhs, op)?;
            let b = expect_bool(rhs, op)?;
            Ok(Value::from(if op == BinOp::And { a && b } else { a || b }))
        }
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    if let (Some(a), Some(b)) = (lhs.as_scalar(), rhs.as_scalar()) {
        if a.as_f64().is_some() && b.as_f64().is_some() {
            return a.compare(b) == std::cmp::Ordering::Equal;
        }
    }
    lhs == rhs
}

fn arithmetic(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, ScriptError> {
    let type_error = || {
        ScriptError::msg(format!(
            "operator {:?} does not apply to {} and {}",
            op.symbol(),
            lhs.type_name(),
            rhs.type_name()
        ))
    };

    // String concatenation.
    if op == BinOp::Add {
        if let (Some(Scalar::Str(a)), Some(Scalar::Str(b))) = (lhs.as_scalar(), rhs.as_scalar()) {
            return Ok(Value::from(format!("{a}{b}").as_str()));
        }
    }

    let (Some(a), Some(b)) = (lhs.as_scalar(), rhs.as_scalar()) else {
        return Err(type_error());
    };

    // Nulls propagate through arithmetic instead of failing the row.
    if a.is_null() || b.is_null() {
        return Ok(Value::Scalar(Scalar::Null));
    }

    if let (Scalar::Int(a), Scalar::Int(b)) = (a, b) {
        return match op {
            BinOp::Add => a.checked_add(*b).map(Value::from).ok_or_else(overflow),
            BinOp::Sub => a.checked_sub(*b).map(Value::from).ok_or_else(overflow),
            BinOp::Mul => a.checked_mul(*b).map(Value::from).ok_or_else(overflow),
            BinOp::Div => {
                if *b == 0 {
                    Err(division_by_zero())
                } else {
                    Ok(Value::from(*a as f64 / *b as f64))
                }
            }
            BinOp::Rem => {
                if *b == 0 {
                    Err(division_by_zero())
                } else {
                    Ok(Value::from(a % b))
                }
            }
            _ => unreachable!(),
        };
    }

    let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) else {
        return Err(type_error());
    };
    match op {
        BinOp::Add => Ok(Value::from(a + b)),
        BinOp::Sub => Ok(Value::from(a - b)),
        BinOp::Mul => Ok(Value::from(a * b)),
        BinOp::Div => {
            if b == 0.0 {
                Err(division_by_zero())
            } else {
                Ok(Value::from(a / b))
            }
        }
        BinOp::Rem => {
            if b == 0.0 {
                Err(division_by_zero())
            } else {
                Ok(Value::from(a % b))
            }
        }
        _ => unreachable!(),
    }
}

fn division_by_zero() -> ScriptError {
    ScriptError::msg("division by zero")
}

fn overflow() -> ScriptError {
    ScriptError::msg("integer overflow")
}
