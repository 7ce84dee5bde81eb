use geophylo::{LeaderStyle, generate};
use geophylo_render::{SvgRenderOptions, render_geophylogeny_svg};

fn prepared_instance(style: LeaderStyle) -> geophylo::Geophylogeny {
    let mut geophylogeny = generate::uniform_instance(500, 300, 8, "render-smoke", 77).unwrap();
    geophylogeny.set_leader_style(style);
    geophylogeny.compute_x_coordinates();
    geophylogeny.compute_y_coordinates(SvgRenderOptions::default().y_step);
    geophylogeny
}

#[test]
fn renders_all_layers_for_straight_leaders() {
    let geophylogeny = prepared_instance(LeaderStyle::S);
    let svg = render_geophylogeny_svg(&geophylogeny, &SvgRenderOptions::default());

    assert!(svg.starts_with("<svg "));
    assert!(svg.ends_with("</svg>\n"));
    for layer in [
        "backgroundLayer",
        "leaderLayer",
        "labelLayer",
        "siteLayer",
        "edgeLayer",
        "vertexLayer",
    ] {
        assert!(svg.contains(layer), "missing {layer}");
    }

    let circles = svg.matches("<circle ").count();
    assert_eq!(circles, geophylogeny.tree().num_vertices());
    let markers = svg.matches(r#"<path id="s"#).count();
    assert_eq!(markers, geophylogeny.tree().num_leaves());
}

#[test]
fn none_style_skips_the_leader_layer() {
    let geophylogeny = prepared_instance(LeaderStyle::None);
    let svg = render_geophylogeny_svg(&geophylogeny, &SvgRenderOptions::default());
    assert!(!svg.contains("leaderLayer"));
    assert!(svg.contains("vertexLayer"));
}

#[test]
fn labels_can_be_turned_off() {
    let geophylogeny = prepared_instance(LeaderStyle::Po);
    let options = SvgRenderOptions {
        include_labels: false,
        ..Default::default()
    };
    let svg = render_geophylogeny_svg(&geophylogeny, &options);
    assert!(!svg.contains("labelLayer"));
    assert!(!svg.contains("<text "));
}

#[test]
fn orthogonal_leaders_draw_two_segment_paths() {
    let geophylogeny = prepared_instance(LeaderStyle::Po);
    let svg = render_geophylogeny_svg(&geophylogeny, &SvgRenderOptions::default());

    let leader_section = svg
        .split(r#"<g id="leaderLayer">"#)
        .nth(1)
        .and_then(|rest| rest.split("</g>").next())
        .unwrap();
    let leaders = leader_section.matches("<path ").count();
    assert_eq!(leaders, geophylogeny.tree().num_leaves());
    // Each orthogonal path has a move plus two line segments.
    for path in leader_section.lines().filter(|l| l.contains("d=\"M")) {
        let d = path.split("d=\"").nth(1).unwrap();
        assert!(d.split(' ').count() >= 3, "short leader path: {d}");
    }
}
