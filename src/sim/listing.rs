// listing.rs - Display listings of each effect's algorithm
//
// Static text shown by the host next to the running backdrop. Not derived
// from live state.

use super::EffectKind;

const NETWORK: &str = r#"// matrix: drifting nodes linked by proximity
for node in &mut nodes {
    node.pos += node.vel;
    if node.pos.x < 0.0 || node.pos.x > width  { node.vel.x = -node.vel.x; }
    if node.pos.y < 0.0 || node.pos.y > height { node.vel.y = -node.vel.y; }
}

let threshold = width.max(height) * span / divisor;
for i in 0..nodes.len() {
    let mut links = 0;
    for j in i + 1..nodes.len() {
        if links == max_links { break; }
        let d = nodes[i].pos.dist(nodes[j].pos);
        if d < threshold {
            line(nodes[i].pos, nodes[j].pos, 0.2 + 0.4 * (1.0 - d / threshold));
            links += 1;
        }
    }
}
"#;

const WAVES: &str = r#"// waves: three layered sine fills
time += time_step;
for (i, wave) in waves.iter().enumerate() {
    let base = height * 0.6 + i as f32 * 40.0;
    let mut path = vec![(0.0, base)];
    let mut x = 0.0;
    while x < width {
        let y = base + wave.amplitude
            * (x / wave.wavelength * TAU + wave.phase + time * wave.speed).sin();
        path.push((x, y));
        x += 5.0;
    }
    path.extend([(width, height), (0.0, height)]);
    fill(&path, gradient(wave.color, TRANSPARENT));
}
"#;

const TRAILS: &str = r#"// stars: glowing particles with fading trails
for p in &mut particles {
    p.pos += p.vel;
    p.trail.push_back(p.pos);
    if p.trail.len() > p.trail_length { p.trail.pop_front(); }
    p.age += 1;

    let life = 1.0 - p.age as f32 / p.max_life as f32;
    for (i, t) in p.trail.iter().enumerate() {
        let k = i as f32 / p.trail.len() as f32;
        circle(t, p.size * 1.2 * k, hsla(p.hue, 0.95, 0.75, k * life * 0.9));
    }
    circle(p.pos, p.size, hsla(p.hue, 0.95, 0.75, (life * 1.8).min(1.0)));

    bounce(&mut p.pos, &mut p.vel, width, height);
    if p.age >= p.max_life { *p = Particle::random(); }
}
"#;

const SQUARES: &str = r#"// flow: slowly rotating squares
for sq in &mut squares {
    sq.angle += sq.spin;
    sq.pos += sq.vel;

    let half = sq.size / 2.0;
    if sq.pos.x < -half { sq.pos.x = width + half; }
    else if sq.pos.x > width + half { sq.pos.x = -half; }
    if sq.pos.y < -half { sq.pos.y = height + half; }
    else if sq.pos.y > height + half { sq.pos.y = -half; }

    square(sq.pos, sq.size, sq.angle, (!sq.border_only).then_some(sq.fill), sq.border);
}
"#;

pub(super) fn source(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::Network => NETWORK,
        EffectKind::Waves => WAVES,
        EffectKind::Trails => TRAILS,
        EffectKind::Squares => SQUARES,
    }
}
