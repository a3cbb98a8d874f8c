// Event script parser: one UI event per line

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::space1,
    combinator::{all_consuming, cut, map, map_res, value},
    error::ErrorKind,
    sequence::{preceded, separated_pair, tuple},
    IResult,
};
use tracing::debug;

use super::lexer::{dimensions, identifier, keyword, number_literal, string_literal, timestamp, ws};
use crate::error::{VizError, VizResult};
use crate::interaction::Event;
use crate::record::{Attribute, Variable};
use crate::selection::{ChartId, Viewport};

/// Parse a single event
/// Format: select <attr> | check <var> | uncheck <var> | legend "<key>"
///       | brush <axis> <y0> <y1> | brush <axis> clear
///       | hover <x> <y> | move <x> <y> | leave
///       | resize <chart> <w>x<h> @<ms> | tick @<ms>
pub fn parse_event(input: &str) -> IResult<&str, Event> {
    alt((
        parse_select,
        parse_checked,
        parse_legend,
        parse_brush,
        parse_pointer,
        parse_resize,
        parse_tick,
    ))(input)
}

fn parse_select(input: &str) -> IResult<&str, Event> {
    let (input, _) = keyword("select")(input)?;
    map(cut(map_res(identifier, |s| s.parse::<Attribute>())), Event::SelectAttribute)(input)
}

fn parse_checked(input: &str) -> IResult<&str, Event> {
    let (input, checked) = alt((
        value(true, keyword("check")),
        value(false, keyword("uncheck")),
    ))(input)?;
    let (input, variable) = cut(map_res(identifier, |s| s.parse::<Variable>()))(input)?;
    Ok((input, Event::SetChecked { variable, checked }))
}

fn parse_legend(input: &str) -> IResult<&str, Event> {
    let (input, _) = keyword("legend")(input)?;
    map(string_literal, Event::LegendClick)(input)
}

fn parse_brush(input: &str) -> IResult<&str, Event> {
    let (input, _) = keyword("brush")(input)?;
    let (input, axis) = cut(map_res(identifier, |s| s.parse::<Variable>()))(input)?;
    let (input, _) = space1(input)?;
    let (input, selection) = alt((
        value(None, tag("clear")),
        map(
            separated_pair(number_literal, space1, number_literal),
            Some,
        ),
    ))(input)?;
    Ok((input, Event::Brush { axis, selection }))
}

fn parse_pointer(input: &str) -> IResult<&str, Event> {
    alt((
        map(
            preceded(
                alt((keyword("hover"), keyword("move"))),
                separated_pair(number_literal, space1, number_literal),
            ),
            |(x, y)| Event::PointerMove { x, y },
        ),
        value(Event::PointerLeave, tag("leave")),
    ))(input)
}

fn parse_resize(input: &str) -> IResult<&str, Event> {
    let (input, _) = keyword("resize")(input)?;
    let (input, (chart, _, (width, height), _, at_ms)) = tuple((
        cut(map_res(identifier, |s| s.parse::<ChartId>())),
        space1,
        dimensions,
        space1,
        timestamp,
    ))(input)?;
    Ok((
        input,
        Event::Resize {
            chart,
            viewport: Viewport::new(width, height),
            at_ms,
        },
    ))
}

fn parse_tick(input: &str) -> IResult<&str, Event> {
    let (input, _) = keyword("tick")(input)?;
    map(timestamp, |at_ms| Event::Tick { at_ms })(input)
}

/// Parse a whole script, skipping blank lines and `#` comments.
pub fn parse_script(source: &str) -> VizResult<Vec<Event>> {
    let mut events = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match all_consuming(ws(parse_event))(trimmed) {
            Ok((_, event)) => events.push(event),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let message = if e.code == ErrorKind::MapRes {
                    format!("unknown name in `{}`", trimmed)
                } else {
                    format!("expected an event, found `{}`", trimmed)
                };
                return Err(VizError::Parse {
                    line: index + 1,
                    message,
                });
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(VizError::Parse {
                    line: index + 1,
                    message: format!("incomplete event `{}`", trimmed),
                });
            }
        }
    }
    debug!(events = events.len(), "event script parsed");
    Ok(events)
}
