use opj_model::{
    AxisPosition, AxisRange, AxisScale, CurveKind, Graph, GraphAxis, GraphCurve, GraphLayer,
    TextBox,
};

use crate::blocks::Block;
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::{FormatRevision, FormatVersion};

use super::window::{
    block_text, graph_axis_count, read_layers, read_rect, read_window_header, require_len,
    LayerBlocks,
};
use super::{DecodeContext, Record, SectionKind};

const X_RANGE_OFFSET: usize = 0x0F;
const Y_RANGE_OFFSET: usize = 0x3A;
const LAYER_HEADER_MIN_LEN: usize = Y_RANGE_OFFSET + 24;
const LAYER_FRAME_OFFSET: usize = 0x71;

const ANNOTATION_FRAME_OFFSET: usize = 0x03;
const ANNOTATION_NAME_OFFSET: usize = 0x46;

const CURVE_KIND_OFFSET: usize = 0x04;
const CURVE_Y_NAME_OFFSET: usize = 0x12;
const CURVE_X_NAME_OFFSET: usize = 0x2B;
const CURVE_NAME_LEN: usize = 25;
const CURVE_LINE_WIDTH_OFFSET: usize = 0x4C;
const CURVE_HEADER_MIN_LEN: usize = 0x52;

const AXIS_MIN_LEN: usize = 6;

fn read_range(c: &mut BinaryCursor<'_>, offset: usize) -> Result<AxisRange, DecodeError> {
    c.seek(offset)?;
    Ok(AxisRange {
        from: c.read_f64()?,
        to: c.read_f64()?,
        step: c.read_f64()?,
    })
}

fn decode_annotation(
    header: &Block<'_>,
    text: &Block<'_>,
    codepage: u16,
) -> Result<TextBox, DecodeError> {
    require_len(header, ANNOTATION_NAME_OFFSET + 1, SectionKind::Graph, "annotation header")?;
    let mut c = header.cursor();
    c.seek(ANNOTATION_FRAME_OFFSET)?;
    let frame = read_rect(&mut c)?;
    c.seek(ANNOTATION_NAME_OFFSET)?;
    let name = c.read_cstring(header.len() - ANNOTATION_NAME_OFFSET, codepage)?;
    Ok(TextBox {
        name,
        text: block_text(text, codepage),
        frame,
    })
}

fn decode_curve(
    header: &Block<'_>,
    version: &FormatVersion,
    codepage: u16,
) -> Result<GraphCurve, DecodeError> {
    require_len(header, CURVE_HEADER_MIN_LEN, SectionKind::Graph, "curve header")?;
    let mut c = header.cursor();
    c.seek(CURVE_KIND_OFFSET)?;
    let kind = CurveKind::from_code(c.read_u8()?);
    c.seek(CURVE_Y_NAME_OFFSET)?;
    let y_dataset = c.read_fixed_string(CURVE_NAME_LEN, codepage)?;
    let x_dataset = if version.is_at_least(FormatRevision::V410) {
        c.seek(CURVE_X_NAME_OFFSET)?;
        Some(c.read_fixed_string(CURVE_NAME_LEN, codepage)?).filter(|name| !name.is_empty())
    } else {
        None
    };
    c.seek(CURVE_LINE_WIDTH_OFFSET)?;
    let line_width = f64::from(c.read_u16()?) / 100.0;
    Ok(GraphCurve {
        kind,
        x_dataset,
        y_dataset,
        line_width,
        line_style: c.read_u8()?,
        color: c.read_u8()?,
        symbol_shape: c.read_u8()?,
        symbol_size: c.read_u8()?,
    })
}

fn decode_axis(block: &Block<'_>, codepage: u16) -> Result<GraphAxis, DecodeError> {
    require_len(block, AXIS_MIN_LEN, SectionKind::Graph, "axis block")?;
    let mut c = block.cursor();
    Ok(GraphAxis {
        scale: AxisScale::from_code(c.read_u8()?),
        position: AxisPosition::from_code(c.read_u8()?),
        major_ticks: c.read_u16()?,
        minor_ticks: c.read_u16()?,
        title: c.read_cstring(block.len() - AXIS_MIN_LEN, codepage)?,
    })
}

fn decode_layer(
    layer: &LayerBlocks<'_>,
    version: &FormatVersion,
    codepage: u16,
) -> Result<GraphLayer, DecodeError> {
    require_len(
        &layer.header,
        LAYER_HEADER_MIN_LEN,
        SectionKind::Graph,
        "graph layer header",
    )?;
    let mut c = layer.header.cursor();
    let mut out = GraphLayer {
        x_range: read_range(&mut c, X_RANGE_OFFSET)?,
        y_range: read_range(&mut c, Y_RANGE_OFFSET)?,
        ..GraphLayer::default()
    };
    if layer.header.len() >= LAYER_FRAME_OFFSET + 8 {
        c.seek(LAYER_FRAME_OFFSET)?;
        out.frame = read_rect(&mut c)?;
    }

    for (header, text) in &layer.annotations {
        let text_box = decode_annotation(header, text, codepage)?;
        match text_box.name.as_str() {
            "Legend" => out.legend = Some(text_box),
            "XB" => out.x_title = Some(text_box),
            "YL" => out.y_title = Some(text_box),
            _ => out.texts.push(text_box),
        }
    }

    out.curves = layer
        .curves
        .iter()
        .map(|(header, _data)| decode_curve(header, version, codepage))
        .collect::<Result<_, _>>()?;
    out.axes = layer
        .axes
        .iter()
        .map(|block| decode_axis(block, codepage))
        .collect::<Result<_, _>>()?;
    Ok(out)
}

pub fn decode_graph_window(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header = read_window_header(cursor, SectionKind::Graph, version, ctx)?;
    let layers = read_layers(cursor, graph_axis_count(version))?;

    let mut graph = Graph {
        window: header.window,
        layers: Vec::with_capacity(layers.len()),
    };
    for layer in &layers {
        graph.layers.push(decode_layer(layer, version, ctx.codepage)?);
    }
    Ok(Record::Graph(graph))
}
